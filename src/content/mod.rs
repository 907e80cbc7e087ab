//! # Content Module
//!
//! Demo content generators that fill the voxel volume with simple shapes:
//! a ground plane, solid and hollow cubes, a sphere, noise terrain and a
//! random scatter field. Every generator follows the streaming contract:
//! given a cell box and a world offset it overwrites each cell in the box
//! with the content of `cell + offset`, so shapes stay coherent as the
//! window scrolls.

use cgmath::{Point3, Vector3};
use noise::{NoiseFn, Perlin};
use num_derive::FromPrimitive;

use crate::error::EngineError;
use crate::streaming::ContentGenerator;
use crate::voxels::volume::VoxelVolume;
use crate::voxels::{VoxelId, EMPTY_VOXEL};

/// Threshold above which noise is considered solid for terrain generation.
const TERRAIN_POSITIVE_THRESHOLD: f64 = 0.2;
/// Threshold below which noise is considered solid for terrain generation.
const TERRAIN_NEGATIVE_THRESHOLD: f64 = -0.2;
/// Scaling factor applied to world coordinates when sampling terrain noise.
const TERRAIN_SCALE_FACTOR: f64 = 0.02;
/// Fraction of cells filled by the scatter shape.
const SCATTER_DENSITY: f64 = 0.1;

/// The demo shapes a scene can be filled with.
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive)]
pub enum Shape {
    /// A one-voxel-thick plane at world z = 0.
    PlaneXy,
    /// A filled cube with one corner at the world origin.
    SolidCube,
    /// The hollow shell of a cube with one corner at the world origin.
    WireCube,
    /// A filled sphere centered on the world origin.
    Sphere,
    /// Unbounded noise terrain.
    Terrain,
    /// Unbounded random scatter field.
    Scatter,
}

impl Shape {
    /// Resolves a shape from its numeric selector.
    pub fn from_selector(selector: u8) -> Result<Self, EngineError> {
        num::FromPrimitive::from_u8(selector).ok_or(EngineError::UnsupportedShape(selector))
    }
}

/// Size selector for the bounded shapes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive)]
pub enum ShapeExtent {
    /// 10 voxels on a side.
    Size10,
    /// 100 voxels on a side.
    Size100,
    /// 1000 voxels on a side.
    Size1000,
    /// No bound; bounded shapes fall back to their largest size.
    Infinite,
}

impl ShapeExtent {
    /// Resolves an extent from its numeric selector.
    pub fn from_selector(selector: u8) -> Result<Self, EngineError> {
        num::FromPrimitive::from_u8(selector).ok_or(EngineError::UnsupportedExtent(selector))
    }

    /// The extent in voxels.
    pub fn size_in_voxels(self) -> i32 {
        10_i32.pow(self as u32 + 1)
    }
}

/// Applies `fill_cell(world) -> kind` over a requested box.
fn fill_with<F>(
    lower: Point3<i32>,
    upper: Point3<i32>,
    offset: Vector3<i32>,
    volume: &mut VoxelVolume,
    mut fill_cell: F,
) where
    F: FnMut(Point3<i32>) -> VoxelId,
{
    for z in lower.z..upper.z {
        for y in lower.y..upper.y {
            for x in lower.x..upper.x {
                let pos = Point3::new(x, y, z);
                let world = Point3::new(x + offset.x, y + offset.y, z + offset.z);
                volume.at_mut(pos).kind = fill_cell(world);
            }
        }
    }
}

fn plane_infinite(voxel: VoxelId) -> Box<dyn ContentGenerator> {
    Box::new(
        move |lower: Point3<i32>,
              upper: Point3<i32>,
              offset: Vector3<i32>,
              volume: &mut VoxelVolume| {
            fill_with(lower, upper, offset, volume, |world| {
                if world.z == 0 {
                    voxel
                } else {
                    EMPTY_VOXEL
                }
            });
        },
    )
}

fn plane_finite(voxel: VoxelId, size: i32) -> Box<dyn ContentGenerator> {
    Box::new(
        move |lower: Point3<i32>,
              upper: Point3<i32>,
              offset: Vector3<i32>,
              volume: &mut VoxelVolume| {
            fill_with(lower, upper, offset, volume, |world| {
                if (0..size).contains(&world.x) && (0..size).contains(&world.y) && world.z == 0 {
                    voxel
                } else {
                    EMPTY_VOXEL
                }
            });
        },
    )
}

fn solid_cube(voxel: VoxelId, size: i32) -> Box<dyn ContentGenerator> {
    Box::new(
        move |lower: Point3<i32>,
              upper: Point3<i32>,
              offset: Vector3<i32>,
              volume: &mut VoxelVolume| {
            fill_with(lower, upper, offset, volume, |world| {
                if (0..size).contains(&world.x)
                    && (0..size).contains(&world.y)
                    && (0..size).contains(&world.z)
                {
                    voxel
                } else {
                    EMPTY_VOXEL
                }
            });
        },
    )
}

fn wire_cube(voxel: VoxelId, size: i32) -> Box<dyn ContentGenerator> {
    Box::new(
        move |lower: Point3<i32>,
              upper: Point3<i32>,
              offset: Vector3<i32>,
              volume: &mut VoxelVolume| {
            fill_with(lower, upper, offset, volume, |world| {
                let inside = (0..=size).contains(&world.x)
                    && (0..=size).contains(&world.y)
                    && (0..=size).contains(&world.z);
                let on_boundary = world.x == 0
                    || world.x == size
                    || world.y == 0
                    || world.y == size
                    || world.z == 0
                    || world.z == size;
                if inside && on_boundary {
                    voxel
                } else {
                    EMPTY_VOXEL
                }
            });
        },
    )
}

fn sphere(voxel: VoxelId, size: i32) -> Box<dyn ContentGenerator> {
    let radius = size as f32 / 2.0;
    Box::new(
        move |lower: Point3<i32>,
              upper: Point3<i32>,
              offset: Vector3<i32>,
              volume: &mut VoxelVolume| {
            fill_with(lower, upper, offset, volume, |world| {
                let dx = world.x as f32 + 0.5;
                let dy = world.y as f32 + 0.5;
                let dz = world.z as f32 + 0.5;
                if (dx * dx + dy * dy + dz * dz).sqrt() <= radius {
                    voxel
                } else {
                    EMPTY_VOXEL
                }
            });
        },
    )
}

fn terrain(voxel: VoxelId) -> Box<dyn ContentGenerator> {
    let perlin = Perlin::new(0);
    Box::new(
        move |lower: Point3<i32>,
              upper: Point3<i32>,
              offset: Vector3<i32>,
              volume: &mut VoxelVolume| {
            fill_with(lower, upper, offset, volume, |world| {
                let sample = perlin.get([
                    world.x as f64 * TERRAIN_SCALE_FACTOR,
                    world.y as f64 * TERRAIN_SCALE_FACTOR,
                    world.z as f64 * TERRAIN_SCALE_FACTOR,
                ]);
                if !(TERRAIN_NEGATIVE_THRESHOLD..=TERRAIN_POSITIVE_THRESHOLD).contains(&sample) {
                    voxel
                } else {
                    EMPTY_VOXEL
                }
            });
        },
    )
}

/// Mixes a world coordinate into an RNG seed, so a cell's content does not
/// depend on which reload box produced it.
fn cell_seed(world: Point3<i32>) -> u64 {
    let mut seed = 0x9e37_79b9_7f4a_7c15_u64;
    for component in [world.x, world.y, world.z] {
        seed ^= component as u64;
        seed = seed.wrapping_mul(0xff51_afd7_ed55_8ccd).rotate_left(31);
    }
    seed
}

fn scatter(voxel: VoxelId) -> Box<dyn ContentGenerator> {
    Box::new(
        move |lower: Point3<i32>,
              upper: Point3<i32>,
              offset: Vector3<i32>,
              volume: &mut VoxelVolume| {
            fill_with(lower, upper, offset, volume, |world| {
                let mut rng = fastrand::Rng::with_seed(cell_seed(world));
                if rng.f64() < SCATTER_DENSITY {
                    voxel
                } else {
                    EMPTY_VOXEL
                }
            });
        },
    )
}

/// Builds the content generator for a shape selection, filling matching
/// cells with `voxel`.
///
/// The bounded shapes use `extent` for their size; `Terrain` and `Scatter`
/// are unbounded and ignore it.
pub fn shape_generator(
    shape: Shape,
    extent: ShapeExtent,
    voxel: VoxelId,
) -> Box<dyn ContentGenerator> {
    let size = extent.size_in_voxels();
    match shape {
        Shape::PlaneXy => {
            if extent == ShapeExtent::Infinite {
                plane_infinite(voxel)
            } else {
                plane_finite(voxel, size)
            }
        }
        Shape::SolidCube => solid_cube(voxel, size),
        Shape::WireCube => wire_cube(voxel, size),
        Shape::Sphere => sphere(voxel, size),
        Shape::Terrain => terrain(voxel),
        Shape::Scatter => scatter(voxel),
    }
}
