//! # Resources Module
//!
//! Load-once caches for the shading resources the renderer consumes:
//! shader programs resolved from a built-in catalog, and textures decoded
//! from image files (or pre-seeded in memory). Handles are shared and
//! idempotent: asking for the same name or path twice returns the same
//! handle. Uploading these objects to a graphics device is the backend's
//! concern, not this module's.

pub mod shader;
pub mod texture;

use crate::error::EngineError;
use shader::{ShaderHandle, ShaderPool};
use texture::{Texture, TextureHandle, TexturePool};

/// A general resource pool containing the shader and texture pools.
pub struct ResourcePool {
    shaders: ShaderPool,
    textures: TexturePool,
}

impl ResourcePool {
    /// Creates a pool with empty caches.
    pub fn new() -> Self {
        ResourcePool {
            shaders: ShaderPool::new(),
            textures: TexturePool::new(),
        }
    }

    /// Gets the shader program named `name`, resolving it on first use.
    pub fn get_shader_program(&mut self, name: &str) -> Result<ShaderHandle, EngineError> {
        self.shaders.get(name)
    }

    /// Gets the texture at `path`, decoding it on first use.
    pub fn get_texture(&mut self, path: &str) -> Result<TextureHandle, EngineError> {
        self.textures.get(path)
    }

    /// Seeds the texture cache with an in-memory texture under `key`.
    pub fn insert_texture(&mut self, key: &str, texture: Texture) -> TextureHandle {
        self.textures.insert(key, texture)
    }
}

impl Default for ResourcePool {
    fn default() -> Self {
        Self::new()
    }
}
