//! # Rendering Module
//!
//! The perspective voxel renderer: walks the voxel volume in camera-relative
//! order and emits one draw request per visible voxel through the
//! [`FacePrimitive`](primitive::FacePrimitive) contract.
//!
//! ## Traversal
//!
//! Each frame the renderer picks the coordinate axis most aligned with the
//! camera direction and sweeps the volume one cell-plane at a time along it,
//! from the camera toward the far cutoff. The cross-section on the two
//! perpendicular axes grows linearly with sweep distance and is biased
//! toward the signed camera direction on each axis, approximating the view
//! cone with an expanding rectangle. Candidate voxels then pass a cheap
//! test chain ordered most-rejecting first: empty cell, distance bounds, an
//! approximate cone test, and finally neighbor occlusion which clears the
//! face bits covered by solid neighbors.
//!
//! ## Detail tiers
//!
//! Visible voxels select one of three shading programs by normalized
//! camera distance: relief mapping close up, bump shading at mid range and
//! plain shading far out. The thresholds are runtime-tunable fractions of
//! the far cutoff.

use cgmath::{EuclideanSpace, InnerSpace, Matrix4, Point3, Rad, SquareMatrix, Vector3};
use log::trace;

use crate::error::EngineError;
use crate::resources::shader::ShaderHandle;
use crate::resources::texture::TextureHandle;
use crate::resources::ResourcePool;
use crate::scene::{SceneComponent, SceneContext};
use crate::voxels::VoxelId;

pub mod primitive;
pub mod render_info;

use primitive::FacePrimitive;
use render_info::{FaceSet, RenderInfo};

/// Fixed bias added to the cone half-angle so the acceptance cone is a
/// little wider than the screen-exact frustum.
const CONE_BIAS: f32 = 0.375;

/// Perpendicular expansion per sweep step away from the camera, toward and
/// against the signed camera direction on that axis.
fn expansion_bias(direction: f32) -> (i32, i32) {
    if direction > 0.25 {
        (1, 3)
    } else if direction < -0.25 {
        (3, 1)
    } else {
        (1, 1)
    }
}

/// The coordinate axis most aligned with the camera direction; the sweep
/// axis of the visibility traversal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DominantAxis {
    /// Sweep along x.
    X,
    /// Sweep along y.
    Y,
    /// Sweep along z.
    Z,
}

impl DominantAxis {
    /// Picks the axis with the largest direction component magnitude.
    pub fn from_direction(direction: Vector3<f32>) -> Self {
        let mag_x = direction.x.abs();
        let mag_y = direction.y.abs();
        let mag_z = direction.z.abs();
        if mag_x > mag_z {
            if mag_x > mag_y {
                DominantAxis::X
            } else {
                DominantAxis::Y
            }
        } else if mag_y > mag_z {
            DominantAxis::Y
        } else {
            DominantAxis::Z
        }
    }

    /// The coordinate index of this axis.
    pub fn index(self) -> usize {
        match self {
            DominantAxis::X => 0,
            DominantAxis::Y => 1,
            DominantAxis::Z => 2,
        }
    }
}

/// A voxel type description: the texture paths of its two maps.
#[derive(Clone, Debug, Default)]
pub struct VoxelType {
    /// Path (or pool key) of the base color texture.
    pub surface_texture: String,
    /// Path (or pool key) of the relief/detail texture.
    pub relief_texture: String,
}

impl VoxelType {
    /// Creates an empty description.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base color texture path.
    pub fn with_surface(mut self, path: impl Into<String>) -> Self {
        self.surface_texture = path.into();
        self
    }

    /// Sets the relief texture path.
    pub fn with_relief(mut self, path: impl Into<String>) -> Self {
        self.relief_texture = path.into();
        self
    }
}

/// Resolved texture handles for one registered voxel type.
struct VoxelTypeSlot {
    surface: TextureHandle,
    relief: TextureHandle,
}

/// Scene component that renders the voxel volume in perspective.
pub struct PerspectiveRenderer {
    /// Vertical field of view, in degrees.
    pub fov: f32,
    /// Near plane of the projection.
    pub near: f32,
    /// Far plane of the projection and distance cutoff of the traversal.
    pub far: f32,
    /// Fraction of the far cutoff past which the middle tier is used.
    pub middle_lod: f32,
    /// Fraction of the far cutoff past which the far tier is used.
    pub far_lod: f32,
    screen_width: f32,
    screen_height: f32,
    voxels_rendered: u32,
    near_shader: ShaderHandle,
    middle_shader: ShaderHandle,
    far_shader: ShaderHandle,
    cos_fov: f32,
    dominant_axis: DominantAxis,
    voxel_types: Vec<VoxelTypeSlot>,
    projection: Matrix4<f32>,
    view: Matrix4<f32>,
    attached: bool,
}

impl PerspectiveRenderer {
    /// Creates a renderer for the given viewport, resolving the three tier
    /// shader programs from `pool`.
    pub fn new(
        pool: &mut ResourcePool,
        screen_width: f32,
        screen_height: f32,
    ) -> Result<Self, EngineError> {
        Ok(PerspectiveRenderer {
            fov: 30.0,
            near: 2.0,
            far: 50.0,
            middle_lod: 0.75,
            far_lod: 0.95,
            screen_width,
            screen_height,
            voxels_rendered: 0,
            near_shader: pool.get_shader_program("relief")?,
            middle_shader: pool.get_shader_program("bump")?,
            far_shader: pool.get_shader_program("simple")?,
            cos_fov: 0.0,
            dominant_axis: DominantAxis::X,
            voxel_types: Vec::new(),
            projection: Matrix4::identity(),
            view: Matrix4::identity(),
            attached: false,
        })
    }

    /// Updates the viewport dimensions used for aspect ratio and the cone
    /// half-angle.
    pub fn resize(&mut self, screen_width: f32, screen_height: f32) {
        self.screen_width = screen_width;
        self.screen_height = screen_height;
    }

    /// Number of voxels emitted by the most recent [`render`](Self::render).
    pub fn voxels_rendered(&self) -> u32 {
        self.voxels_rendered
    }

    /// Registers a voxel type, resolving its textures through `pool`, and
    /// returns the kind to store in the volume for it. Kinds are handed out
    /// from 1 upward; 0 stays the empty cell.
    pub fn insert_voxel_type(
        &mut self,
        pool: &mut ResourcePool,
        voxel_type: &VoxelType,
    ) -> Result<VoxelId, EngineError> {
        if self.voxel_types.len() >= VoxelId::MAX as usize {
            return Err(EngineError::VoxelTypeTableFull);
        }
        let slot = VoxelTypeSlot {
            surface: pool.get_texture(&voxel_type.surface_texture)?,
            relief: pool.get_texture(&voxel_type.relief_texture)?,
        };
        self.voxel_types.push(slot);
        Ok(self.voxel_types.len() as VoxelId)
    }

    /// Sweeps the volume and emits one draw request per visible voxel.
    /// Returns the number of voxels emitted.
    pub fn render(&mut self, ctx: &SceneContext, primitive: &mut dyn FacePrimitive) -> u32 {
        assert!(self.attached, "renderer used before attach");
        let camera_dir = ctx.camera.front();
        let camera_pos = ctx.camera.position();
        self.voxels_rendered = 0;

        let axis_i = self.dominant_axis.index();
        let axis_j = (axis_i + 1) % 3;
        let axis_k = (axis_i + 2) % 3;

        let beg_i = camera_pos[axis_i] as i32;
        let base_j = camera_pos[axis_j] as i32;
        let base_k = camera_pos[axis_k] as i32;
        let (beg_bias_j, end_bias_j) = expansion_bias(camera_dir[axis_j]);
        let (beg_bias_k, end_bias_k) = expansion_bias(camera_dir[axis_k]);

        let mut emit_cross_section = |renderer: &mut Self, ci: i32, ind: i32| {
            let beg_j = base_j - ind * beg_bias_j;
            let end_j = base_j + ind * end_bias_j;
            let beg_k = base_k - ind * beg_bias_k;
            let end_k = base_k + ind * end_bias_k;
            for cj in beg_j..end_j {
                for ck in beg_k..end_k {
                    let mut pos = Point3::new(0, 0, 0);
                    pos[axis_i] = ci;
                    pos[axis_j] = cj;
                    pos[axis_k] = ck;
                    renderer.render_voxel(ctx, camera_pos, camera_dir, pos, primitive);
                }
            }
        };

        if camera_dir[axis_i].is_sign_negative() {
            let end_i = (camera_pos[axis_i] - self.far) as i32;
            let base_i = beg_i + 1;
            let mut ci = beg_i;
            while ci >= end_i {
                emit_cross_section(self, ci, base_i - ci);
                ci -= 1;
            }
        } else {
            let end_i = (camera_pos[axis_i] + self.far) as i32;
            let base_i = beg_i - 1;
            let mut ci = beg_i;
            while ci < end_i {
                emit_cross_section(self, ci, ci - base_i);
                ci += 1;
            }
        }
        self.voxels_rendered
    }

    /// Applies the per-voxel test chain and emits the draw request if the
    /// voxel survives. Returns whether a request was emitted.
    fn render_voxel(
        &mut self,
        ctx: &SceneContext,
        camera_pos: Point3<f32>,
        camera_dir: Vector3<f32>,
        pos: Point3<i32>,
        primitive: &mut dyn FacePrimitive,
    ) -> bool {
        let voxel = ctx.volume.at(pos);
        if voxel.is_empty() {
            return false;
        }

        let center = Point3::new(
            pos.x as f32 + 0.5,
            pos.y as f32 + 0.5,
            pos.z as f32 + 0.5,
        );
        let to_voxel = center - camera_pos;
        let distance2 = to_voxel.magnitude2();
        // The camera is inside (or nearly inside) this cell; drawing it
        // would smear its faces over the whole screen.
        if distance2 < 1.0 {
            return false;
        }
        let distance = distance2.sqrt();
        // Normalized distance: greater than one inside the far cutoff,
        // shrinking toward zero beyond it.
        let reach = self.far / distance;
        if reach < 1.0 {
            return false;
        }

        let alignment = camera_dir.dot(to_voxel / distance);
        if alignment.abs() < self.cos_fov {
            return false;
        }

        let mut faces = FaceSet::ALL;
        if !ctx.volume.at(pos + Vector3::new(1, 0, 0)).is_empty() {
            faces.remove(FaceSet::RIGHT);
        }
        if !ctx.volume.at(pos + Vector3::new(-1, 0, 0)).is_empty() {
            faces.remove(FaceSet::LEFT);
        }
        if !ctx.volume.at(pos + Vector3::new(0, 1, 0)).is_empty() {
            faces.remove(FaceSet::FAR);
        }
        if !ctx.volume.at(pos + Vector3::new(0, -1, 0)).is_empty() {
            faces.remove(FaceSet::NEAR);
        }
        if !ctx.volume.at(pos + Vector3::new(0, 0, 1)).is_empty() {
            faces.remove(FaceSet::TOP);
        }
        if !ctx.volume.at(pos + Vector3::new(0, 0, -1)).is_empty() {
            faces.remove(FaceSet::BOTTOM);
        }

        let shader = if reach * self.far_lod < 1.0 {
            &self.far_shader
        } else if reach * self.middle_lod < 1.0 {
            &self.middle_shader
        } else {
            &self.near_shader
        };

        let slot = &self.voxel_types[(voxel.kind - 1) as usize];
        let mut info = RenderInfo::new(shader.clone(), faces);
        info.model = Matrix4::from_translation(center.to_vec());
        info.view = self.view;
        info.projection = self.projection;
        info.surface_texture = Some(slot.surface.clone());
        info.relief_texture = Some(slot.relief.clone());
        primitive.draw(&info);
        self.voxels_rendered += 1;
        true
    }
}

impl SceneComponent for PerspectiveRenderer {
    fn on_update(&mut self, ctx: &mut SceneContext, _dt: f32) {
        assert!(self.attached, "renderer used before attach");
        let rad_fov = Rad::from(cgmath::Deg(self.fov)).0;
        let ratio = self.screen_width / self.screen_height;
        self.cos_fov = (rad_fov / 2.0 * ratio + CONE_BIAS).cos();
        self.projection = cgmath::perspective(cgmath::Deg(self.fov), ratio, self.near, self.far);
        self.view = ctx.camera.make_view();
        self.dominant_axis = DominantAxis::from_direction(ctx.camera.front());
        trace!("sweep axis {:?}", self.dominant_axis);
    }

    fn on_attach(&mut self, _ctx: &mut SceneContext) {
        assert!(!self.attached, "renderer attached twice");
        self.attached = true;
    }

    fn on_detach(&mut self, _ctx: &mut SceneContext) {
        assert!(self.attached, "renderer detached twice");
        self.attached = false;
    }
}

#[cfg(test)]
mod tests {
    use super::primitive::{CountingPrimitive, RecordingPrimitive};
    use super::*;
    use crate::resources::texture::Texture;
    use crate::scene::camera::Camera;
    use crate::voxels::volume::VoxelVolume;

    fn test_setup(camera: Camera) -> (PerspectiveRenderer, SceneContext, VoxelId) {
        let mut pool = ResourcePool::new();
        pool.insert_texture("surface", Texture::checkerboard(16));
        pool.insert_texture("relief-map", Texture::checkerboard(16));
        let mut renderer = PerspectiveRenderer::new(&mut pool, 1200.0, 796.0).unwrap();
        let kind = renderer
            .insert_voxel_type(
                &mut pool,
                &VoxelType::new()
                    .with_surface("surface")
                    .with_relief("relief-map"),
            )
            .unwrap();
        let mut ctx = SceneContext {
            camera,
            volume: VoxelVolume::new(),
        };
        renderer.on_attach(&mut ctx);
        (renderer, ctx, kind)
    }

    /// Camera at (10.5, 0.5, 0.5) looking straight down -x.
    fn looking_back() -> Camera {
        Camera::new(180.0, 0.0, Point3::new(10.5, 0.5, 0.5))
    }

    fn request_at(requests: &[RenderInfo], center: Point3<f32>) -> &RenderInfo {
        requests
            .iter()
            .find(|info| {
                let t = info.model.w;
                (t.x - center.x).abs() < 1e-4
                    && (t.y - center.y).abs() < 1e-4
                    && (t.z - center.z).abs() < 1e-4
            })
            .expect("no draw request for that voxel")
    }

    #[test]
    fn empty_volume_emits_nothing() {
        let (mut renderer, mut ctx, _) = test_setup(looking_back());
        renderer.on_update(&mut ctx, 0.0);
        let mut counter = CountingPrimitive::new();
        assert_eq!(renderer.render(&ctx, &mut counter), 0);
        assert_eq!(counter.voxels(), 0);
        assert_eq!(renderer.voxels_rendered(), 0);
    }

    #[test]
    fn lone_voxel_keeps_all_six_faces() {
        let (mut renderer, mut ctx, kind) = test_setup(looking_back());
        ctx.volume.at_mut(Point3::new(0, 0, 0)).kind = kind;
        renderer.on_update(&mut ctx, 0.0);
        let mut recorder = RecordingPrimitive::new();
        assert_eq!(renderer.render(&ctx, &mut recorder), 1);
        assert_eq!(recorder.requests.len(), 1);
        assert_eq!(recorder.requests[0].faces, FaceSet::ALL);
    }

    #[test]
    fn solid_block_culls_the_center_voxel_faces() {
        let (mut renderer, mut ctx, kind) = test_setup(looking_back());
        for z in -1..=1 {
            for y in -1..=1 {
                for x in -1..=1 {
                    ctx.volume.at_mut(Point3::new(x, y, z)).kind = kind;
                }
            }
        }
        renderer.on_update(&mut ctx, 0.0);
        let mut recorder = RecordingPrimitive::new();
        assert_eq!(renderer.render(&ctx, &mut recorder), 27);

        let center = request_at(&recorder.requests, Point3::new(0.5, 0.5, 0.5));
        assert_eq!(center.faces, FaceSet::NONE);

        // A corner keeps exactly its three outward faces.
        let corner = request_at(&recorder.requests, Point3::new(1.5, 1.5, 1.5));
        assert_eq!(corner.faces.len(), 3);
        assert!(corner.faces.contains(FaceSet::RIGHT));
        assert!(corner.faces.contains(FaceSet::FAR));
        assert!(corner.faces.contains(FaceSet::TOP));
    }

    #[test]
    fn voxel_outside_the_cone_is_rejected() {
        let (mut renderer, mut ctx, kind) = test_setup(looking_back());
        // Visited by the sweep, but 45 degrees off the view axis.
        ctx.volume.at_mut(Point3::new(5, 5, 0)).kind = kind;
        renderer.on_update(&mut ctx, 0.0);
        let mut counter = CountingPrimitive::new();
        assert_eq!(renderer.render(&ctx, &mut counter), 0);
    }

    #[test]
    fn voxel_at_the_camera_is_rejected() {
        let (mut renderer, mut ctx, kind) = test_setup(looking_back());
        // The camera sits in the middle of this cell.
        ctx.volume.at_mut(Point3::new(10, 0, 0)).kind = kind;
        renderer.on_update(&mut ctx, 0.0);
        let mut counter = CountingPrimitive::new();
        assert_eq!(renderer.render(&ctx, &mut counter), 0);
    }

    #[test]
    fn voxel_beyond_the_far_cutoff_is_rejected() {
        let (mut renderer, mut ctx, kind) = test_setup(looking_back());
        // Inside the sweep and the cone, 54 units out with far at 50.
        ctx.volume.at_mut(Point3::new(-35, 30, 0)).kind = kind;
        renderer.on_update(&mut ctx, 0.0);
        let mut counter = CountingPrimitive::new();
        assert_eq!(renderer.render(&ctx, &mut counter), 0);
    }

    #[test]
    fn detail_tier_follows_distance() {
        let camera = Camera::new(0.0, 0.0, Point3::new(0.5, 0.5, 0.5));
        let (mut renderer, mut ctx, kind) = test_setup(camera);
        ctx.volume.at_mut(Point3::new(10, 0, 0)).kind = kind;
        ctx.volume.at_mut(Point3::new(40, 0, 0)).kind = kind;
        ctx.volume.at_mut(Point3::new(48, 0, 0)).kind = kind;
        renderer.on_update(&mut ctx, 0.0);
        let mut recorder = RecordingPrimitive::new();
        assert_eq!(renderer.render(&ctx, &mut recorder), 3);

        let near = request_at(&recorder.requests, Point3::new(10.5, 0.5, 0.5));
        assert_eq!(near.shader_program.name(), "relief");
        let middle = request_at(&recorder.requests, Point3::new(40.5, 0.5, 0.5));
        assert_eq!(middle.shader_program.name(), "bump");
        let far = request_at(&recorder.requests, Point3::new(48.5, 0.5, 0.5));
        assert_eq!(far.shader_program.name(), "simple");
    }

    #[test]
    fn dominant_axis_picks_the_largest_component() {
        assert_eq!(
            DominantAxis::from_direction(Vector3::new(-0.9, 0.3, 0.2)),
            DominantAxis::X
        );
        assert_eq!(
            DominantAxis::from_direction(Vector3::new(0.3, -0.9, 0.2)),
            DominantAxis::Y
        );
        assert_eq!(
            DominantAxis::from_direction(Vector3::new(0.1, 0.2, 0.9)),
            DominantAxis::Z
        );
    }

    #[test]
    fn voxel_type_table_is_bounded() {
        let (mut renderer, _ctx, _) = test_setup(looking_back());
        let mut pool = ResourcePool::new();
        pool.insert_texture("surface", Texture::checkerboard(16));
        let voxel_type = VoxelType::new()
            .with_surface("surface")
            .with_relief("surface");
        while renderer.voxel_types.len() < VoxelId::MAX as usize {
            renderer.insert_voxel_type(&mut pool, &voxel_type).unwrap();
        }
        assert!(matches!(
            renderer.insert_voxel_type(&mut pool, &voxel_type),
            Err(EngineError::VoxelTypeTableFull)
        ));
    }
}
