//! The draw-primitive contract the renderer emits into, plus the
//! in-process implementations used by the viewer and by tests. Backends
//! that actually rasterize (GL, wgpu, software) live outside this crate
//! and implement the same trait.

use super::render_info::RenderInfo;

/// Consumer of per-voxel draw requests.
///
/// An implementation must draw exactly one unit quad per set face bit,
/// oriented by the fixed face-to-rotation mapping: `TOP` uses the model
/// transform unchanged, `BOTTOM` rotates 180° about y, `RIGHT` +90° about
/// y, `LEFT` -90° about y, `NEAR` +90° about x and `FAR` -90° about x. The
/// quad is textured with the surface/relief pair, lit with the light
/// parameters (direction normalized before use) and tinted with the tint
/// color, all through the bundled shader program.
pub trait FacePrimitive {
    /// Draws the faces of one voxel described by `info`.
    fn draw(&mut self, info: &RenderInfo);
}

/// Tallies draw requests and face counts without drawing anything.
#[derive(Default)]
pub struct CountingPrimitive {
    voxels: u32,
    faces: u32,
}

impl CountingPrimitive {
    /// Creates a primitive with zeroed tallies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of draw requests received since the last reset.
    pub fn voxels(&self) -> u32 {
        self.voxels
    }

    /// Total number of set face bits received since the last reset.
    pub fn faces(&self) -> u32 {
        self.faces
    }

    /// Zeroes both tallies.
    pub fn reset(&mut self) {
        self.voxels = 0;
        self.faces = 0;
    }
}

impl FacePrimitive for CountingPrimitive {
    fn draw(&mut self, info: &RenderInfo) {
        self.voxels += 1;
        self.faces += info.faces.len();
    }
}

/// Captures every draw request for later inspection.
#[derive(Default)]
pub struct RecordingPrimitive {
    /// The requests received, in emission order.
    pub requests: Vec<RenderInfo>,
}

impl RecordingPrimitive {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }
}

impl FacePrimitive for RecordingPrimitive {
    fn draw(&mut self, info: &RenderInfo) {
        self.requests.push(info.clone());
    }
}
