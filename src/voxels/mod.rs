//! # Voxels Module
//!
//! This module provides the core voxel data types and the fixed-size volume
//! that stores them. A voxel is one unit cube of world content, identified
//! by a compact numeric kind; the volume is a toroidally addressed buffer
//! that acts as a moving window over an unbounded world.
//!
//! ## Memory Layout
//!
//! Voxels are stored by value, one byte per cell, with no per-voxel
//! pointers. The `#[repr(C)]` + `bytemuck` derives pin down the cell layout
//! so the whole volume is a single contiguous, relocatable allocation.

pub mod volume;

/// The underlying integer type used to represent voxel kinds in memory.
pub type VoxelId = u8;

/// The reserved kind for cells that hold no geometry.
pub const EMPTY_VOXEL: VoxelId = 0;

/// The side length of the voxel volume, in cells. Must be a power of two so
/// toroidal addressing reduces to a bitmask.
pub const VOLUME_SIDE: i32 = 256;

/// Per-axis index mask implementing modulo-`VOLUME_SIDE` wraparound.
pub const VOLUME_MASK: i32 = VOLUME_SIDE - 1;

/// Half the volume side; the distance from the window center to its edges.
pub const HALF_SIDE: i32 = VOLUME_SIDE / 2;

/// Granularity of streaming reloads, in cells. Reload extents are always
/// rounded up to a multiple of this.
pub const LOAD_DELTA: i32 = 32;

/// Camera displacement from the window center that triggers a reload on an
/// axis. Keeping a `LOAD_DELTA` margin between the threshold and the window
/// edge means fresh content is in place before the camera can see stale
/// cells.
pub const RELOAD_THRESHOLD: i32 = HALF_SIDE - LOAD_DELTA;

/// Represents a single voxel cell.
///
/// This is a lightweight structure that stores only the voxel kind; all
/// other properties (textures, shading) are looked up from the kind by the
/// renderer's voxel-type table.
#[repr(C)]
#[derive(Copy, Clone, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct Voxel {
    /// The kind of this voxel, `EMPTY_VOXEL` for no geometry.
    pub kind: VoxelId,
}

impl Voxel {
    /// A voxel holding no geometry.
    pub const EMPTY: Voxel = Voxel { kind: EMPTY_VOXEL };

    /// Creates a voxel of the given kind.
    pub fn new(kind: VoxelId) -> Self {
        Voxel { kind }
    }

    /// Returns `true` if this cell holds no geometry.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.kind == EMPTY_VOXEL
    }
}
