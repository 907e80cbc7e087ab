//! # Streaming Module
//!
//! Keeps the fixed voxel volume centered on the camera. Each tick the
//! component compares the camera's displacement from the window center
//! against a per-axis reload threshold; once the threshold is reached it
//! shifts the center by a multiple of the load delta and asks an external
//! content generator to refill exactly the slabs of world space that
//! scrolled into the window. Batching movement into multiples of the load
//! delta gives the reload hysteresis: many small camera steps produce one
//! larger, infrequent reload instead of a reload per step.
//!
//! ## Reload geometry
//!
//! The volume is toroidal, so a box of newly entered world coordinates does
//! not generally map to one contiguous box of cell indices: the full-window
//! ranges on the two perpendicular axes are split at the wraparound seam,
//! giving up to four requests per triggering axis. On the scrolled axis the
//! request range starts at the seam-reduced index of the entered slab and
//! may extend past the volume side; the axis offset is a multiple of the
//! side by construction, so wrapped indices still resolve to the correct
//! cells and world coordinates.

use cgmath::{Point3, Vector3};
use log::debug;

use crate::scene::{SceneComponent, SceneContext};
use crate::voxels::volume::VoxelVolume;
use crate::voxels::{HALF_SIDE, LOAD_DELTA, RELOAD_THRESHOLD, VOLUME_SIDE};

/// Capability for filling regions of the voxel volume with world content.
///
/// `fill` must overwrite every cell with index `idx` in `[lower, upper)`
/// (component-wise, half-open per axis) with the content for world
/// coordinate `idx + offset`. It must not assume any prior cell content and
/// must complete synchronously before returning. On the axis that triggered
/// a reload, `upper` may exceed the volume side; indexing wraps and the
/// world mapping stays correct.
pub trait ContentGenerator {
    /// Fills `[lower, upper)` of `volume` with the content of world
    /// coordinates `[lower + offset, upper + offset)`.
    fn fill(
        &mut self,
        lower: Point3<i32>,
        upper: Point3<i32>,
        offset: Vector3<i32>,
        volume: &mut VoxelVolume,
    );
}

impl<F> ContentGenerator for F
where
    F: FnMut(Point3<i32>, Point3<i32>, Vector3<i32>, &mut VoxelVolume),
{
    fn fill(
        &mut self,
        lower: Point3<i32>,
        upper: Point3<i32>,
        offset: Vector3<i32>,
        volume: &mut VoxelVolume,
    ) {
        self(lower, upper, offset, volume)
    }
}

/// Rounds the overshoot past the reload threshold up to the next multiple
/// of the load delta.
fn area_to_reload(displacement: i32) -> i32 {
    let area = displacement.abs() - RELOAD_THRESHOLD;
    let remainder = area % LOAD_DELTA;
    if remainder != 0 {
        area + LOAD_DELTA - remainder
    } else {
        area
    }
}

/// Scene component that streams world content through the voxel volume.
///
/// The component is the sole writer of the window center: the volume is
/// assumed valid for world coordinates in `[center - side/2,
/// center + side/2)` on each axis. Without a generator both the tick and
/// [`reset`](StreamingComponent::reset) are no-ops.
pub struct StreamingComponent {
    center: Point3<i32>,
    generator: Option<Box<dyn ContentGenerator>>,
    attached: bool,
}

impl StreamingComponent {
    /// Creates a streaming component with no generator attached.
    pub fn new() -> Self {
        StreamingComponent {
            center: Point3::new(0, 0, 0),
            generator: None,
            attached: false,
        }
    }

    /// The world-space center of the currently valid window.
    pub fn center(&self) -> Point3<i32> {
        self.center
    }

    /// Installs the content generator used for subsequent reloads.
    pub fn set_generator(&mut self, generator: Box<dyn ContentGenerator>) {
        self.generator = Some(generator);
    }

    /// Re-centers the window on the volume midpoint and requests one
    /// full-volume reload. Used on world initialization or when the
    /// generator changes. No-op without a generator.
    pub fn reset(&mut self, ctx: &mut SceneContext) {
        assert!(self.attached, "streaming component used before attach");
        let Some(generator) = self.generator.as_mut() else {
            return;
        };
        self.center = Point3::new(HALF_SIDE, HALF_SIDE, HALF_SIDE);
        generator.fill(
            Point3::new(0, 0, 0),
            Point3::new(VOLUME_SIDE, VOLUME_SIDE, VOLUME_SIDE),
            Vector3::new(0, 0, 0),
            &mut ctx.volume,
        );
        debug!("volume reset around center {:?}", self.center);
    }

    /// Checks one axis for a threshold crossing and, if crossed, shifts the
    /// center and issues the reload requests covering the entered slab.
    fn refresh_axis(
        center: &mut Point3<i32>,
        generator: &mut dyn ContentGenerator,
        volume: &mut VoxelVolume,
        displacement: Vector3<i32>,
        axis_i: usize,
    ) {
        let d = displacement[axis_i];
        // The comparison is asymmetric by one unit (>= on the positive
        // side, strict < on the negative) so a displacement sitting exactly
        // on the boundary triggers once, not on both sides.
        let positive = if d >= RELOAD_THRESHOLD {
            true
        } else if d < -RELOAD_THRESHOLD {
            false
        } else {
            return;
        };

        let area = area_to_reload(d);
        if positive {
            center[axis_i] += area;
        } else {
            center[axis_i] -= area;
        }

        // World interval that just entered the window on this axis, and its
        // seam-reduced cell index. The offset comes out as a multiple of
        // the volume side, so the request range may run past the side and
        // still land on the right cells.
        let entered_low = if positive {
            center[axis_i] + HALF_SIDE - area
        } else {
            center[axis_i] - HALF_SIDE
        };
        let low_i = entered_low.rem_euclid(VOLUME_SIDE);
        let offset_i = entered_low - low_i;

        let axis_j = (axis_i + 1) % 3;
        let axis_k = (axis_i + 2) % 3;

        // Full window ranges on the perpendicular axes, split at the
        // wraparound seam into at most two pieces each.
        let window_pieces = |window_low: i32| {
            let seam = window_low.rem_euclid(VOLUME_SIDE);
            let first = (seam, VOLUME_SIDE, window_low - seam);
            let second = if seam != 0 {
                Some((0, seam, window_low + VOLUME_SIDE - seam))
            } else {
                None
            };
            (first, second)
        };
        let (first_j, second_j) = window_pieces(center[axis_j] - HALF_SIDE);
        let (first_k, second_k) = window_pieces(center[axis_k] - HALF_SIDE);

        let mut pieces_j = vec![first_j];
        pieces_j.extend(second_j);
        let mut pieces_k = vec![first_k];
        pieces_k.extend(second_k);

        let mut requests = 0;
        for &(low_j, high_j, offset_j) in &pieces_j {
            for &(low_k, high_k, offset_k) in &pieces_k {
                let mut lower = Point3::new(0, 0, 0);
                let mut upper = Point3::new(0, 0, 0);
                let mut offset = Vector3::new(0, 0, 0);
                lower[axis_i] = low_i;
                upper[axis_i] = low_i + area;
                offset[axis_i] = offset_i;
                lower[axis_j] = low_j;
                upper[axis_j] = high_j;
                offset[axis_j] = offset_j;
                lower[axis_k] = low_k;
                upper[axis_k] = high_k;
                offset[axis_k] = offset_k;
                generator.fill(lower, upper, offset, volume);
                requests += 1;
            }
        }
        debug!(
            "axis {axis_i} reload: area {area}, center {:?}, {requests} request(s)",
            center
        );
    }
}

impl Default for StreamingComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneComponent for StreamingComponent {
    fn on_update(&mut self, ctx: &mut SceneContext, _dt: f32) {
        assert!(self.attached, "streaming component used before attach");
        let Some(generator) = self.generator.as_mut() else {
            return;
        };
        let camera_cell = ctx.camera.position().map(|c| c.floor() as i32);
        let displacement = camera_cell - self.center;
        for axis in 0..3 {
            Self::refresh_axis(
                &mut self.center,
                generator.as_mut(),
                &mut ctx.volume,
                displacement,
                axis,
            );
        }
    }

    fn on_attach(&mut self, _ctx: &mut SceneContext) {
        assert!(!self.attached, "streaming component attached twice");
        self.attached = true;
    }

    fn on_detach(&mut self, _ctx: &mut SceneContext) {
        assert!(self.attached, "streaming component detached twice");
        self.attached = false;
    }
}
