//! Per-draw parameter bundle handed to the face primitive.

use cgmath::{Matrix4, SquareMatrix, Vector4};

use crate::resources::shader::ShaderHandle;
use crate::resources::texture::TextureHandle;

/// The set of cube faces left to draw for one voxel, one bit per face.
///
/// Face bits name the axis direction of the face normal: `RIGHT` is +x,
/// `LEFT` is -x, `FAR` is +y, `NEAR` is -y, `TOP` is +z, `BOTTOM` is -z.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct FaceSet(u8);

impl FaceSet {
    /// No faces.
    pub const NONE: FaceSet = FaceSet(0);
    /// The -x face.
    pub const LEFT: FaceSet = FaceSet(0x01);
    /// The +x face.
    pub const RIGHT: FaceSet = FaceSet(0x02);
    /// The -y face.
    pub const NEAR: FaceSet = FaceSet(0x04);
    /// The +y face.
    pub const FAR: FaceSet = FaceSet(0x08);
    /// The -z face.
    pub const BOTTOM: FaceSet = FaceSet(0x10);
    /// The +z face.
    pub const TOP: FaceSet = FaceSet(0x20);
    /// All six faces.
    pub const ALL: FaceSet = FaceSet(0x3f);

    /// Returns `true` if every face of `faces` is present in this set.
    #[inline]
    pub fn contains(self, faces: FaceSet) -> bool {
        self.0 & faces.0 == faces.0
    }

    /// Removes `faces` from this set.
    #[inline]
    pub fn remove(&mut self, faces: FaceSet) {
        self.0 &= !faces.0;
    }

    /// Returns `true` if no face is present.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of faces present.
    #[inline]
    pub fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// The raw 6-bit mask.
    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }
}

/// Scalar lighting terms applied uniformly to every face of a draw.
#[derive(Copy, Clone, Debug)]
pub struct LightProperty {
    /// Ambient contribution.
    pub ambient: f32,
    /// Diffuse contribution.
    pub diffuse: f32,
    /// Specular contribution.
    pub specular: f32,
}

impl Default for LightProperty {
    fn default() -> Self {
        LightProperty {
            ambient: 0.2,
            diffuse: 0.8,
            specular: 0.0,
        }
    }
}

/// Everything the face primitive needs to draw one voxel: transforms,
/// shading program, textures, the remaining face bits and lighting.
#[derive(Clone)]
pub struct RenderInfo {
    /// Model transform placing the unit cube at the voxel center.
    pub model: Matrix4<f32>,
    /// View transform of the observing camera.
    pub view: Matrix4<f32>,
    /// Projection transform of the observing camera.
    pub projection: Matrix4<f32>,
    /// Color multiplier applied to the textured result.
    pub tint_color: Vector4<f32>,
    /// The shading program selected for this voxel's detail tier.
    pub shader_program: ShaderHandle,
    /// Base color texture.
    pub surface_texture: Option<TextureHandle>,
    /// Relief/detail texture used by the higher-detail tiers.
    pub relief_texture: Option<TextureHandle>,
    /// The faces left to draw after occlusion culling.
    pub faces: FaceSet,
    /// Scalar lighting terms.
    pub light: LightProperty,
    /// Light color.
    pub light_color: Vector4<f32>,
    /// Light direction, normalized by the primitive before use.
    pub light_source: Vector4<f32>,
}

impl RenderInfo {
    /// Default tint: no color change.
    pub const DEFAULT_TINT: Vector4<f32> = Vector4::new(1.0, 1.0, 1.0, 1.0);
    /// Default light color.
    pub const DEFAULT_LIGHT_COLOR: Vector4<f32> = Vector4::new(0.8, 0.8, 0.8, 0.8);
    /// Default light direction.
    pub const DEFAULT_LIGHT_SOURCE: Vector4<f32> = Vector4::new(1.0, 1.0, -1.0, 0.0);

    /// Creates a bundle for one voxel with default tint and lighting.
    pub fn new(shader_program: ShaderHandle, faces: FaceSet) -> Self {
        RenderInfo {
            model: Matrix4::identity(),
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
            tint_color: Self::DEFAULT_TINT,
            shader_program,
            surface_texture: None,
            relief_texture: None,
            faces,
            light: LightProperty::default(),
            light_color: Self::DEFAULT_LIGHT_COLOR,
            light_source: Self::DEFAULT_LIGHT_SOURCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_set_removal_and_counting() {
        let mut faces = FaceSet::ALL;
        assert_eq!(faces.len(), 6);
        faces.remove(FaceSet::TOP);
        faces.remove(FaceSet::LEFT);
        assert_eq!(faces.len(), 4);
        assert!(!faces.contains(FaceSet::TOP));
        assert!(faces.contains(FaceSet::RIGHT));
        faces.remove(FaceSet::ALL);
        assert!(faces.is_empty());
        assert_eq!(faces, FaceSet::NONE);
    }
}
