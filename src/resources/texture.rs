//! # Textures
//!
//! CPU-side texture objects: decoded RGBA pixels plus dimensions. Upload to
//! the graphics device is the consuming backend's job. The pool caches by
//! path with load-once semantics and can be pre-seeded with in-memory
//! textures for headless runs.

use std::collections::HashMap;
use std::rc::Rc;

use crate::error::EngineError;

/// Shared handle to a texture. Repeated pool lookups with the same key
/// return clones of the same handle.
pub type TextureHandle = Rc<Texture>;

/// A decoded texture: tightly packed RGBA8 pixels.
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Texture {
    /// Decodes a texture from an image file.
    pub fn from_file(path: &str) -> Result<Self, EngineError> {
        let decoded = image::open(path).map_err(|source| EngineError::TextureLoad {
            path: path.to_string(),
            source,
        })?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Texture {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }

    /// Wraps raw RGBA8 pixels.
    ///
    /// # Panics
    /// Panics if `pixels.len() != width * height * 4`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        assert_eq!(
            pixels.len(),
            (width * height * 4) as usize,
            "pixel buffer does not match dimensions"
        );
        Texture {
            width,
            height,
            pixels,
        }
    }

    /// A gray/white checkerboard of `size`×`size` pixels, the fallback for
    /// runs with no texture files at hand.
    pub fn checkerboard(size: u32) -> Self {
        let mut pixels = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let light = (x / 8 + y / 8) % 2 == 0;
                let value = if light { 0xe0 } else { 0x70 };
                pixels.extend_from_slice(&[value, value, value, 0xff]);
            }
        }
        Texture {
            width: size,
            height: size,
            pixels,
        }
    }

    /// Texture width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Texture height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The tightly packed RGBA8 pixel data.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// Load-once cache of textures, keyed by path.
pub struct TexturePool {
    textures: HashMap<String, TextureHandle>,
}

impl TexturePool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        TexturePool {
            textures: HashMap::new(),
        }
    }

    /// Returns the texture for `path`, decoding it on first use. Repeated
    /// calls with the same path return the same handle.
    pub fn get(&mut self, path: &str) -> Result<TextureHandle, EngineError> {
        if let Some(texture) = self.textures.get(path) {
            return Ok(texture.clone());
        }
        let texture = Rc::new(Texture::from_file(path)?);
        self.textures.insert(path.to_string(), texture.clone());
        Ok(texture)
    }

    /// Seeds the cache with an in-memory texture under `key`. If the key is
    /// already present the existing handle is kept and returned.
    pub fn insert(&mut self, key: &str, texture: Texture) -> TextureHandle {
        self.textures
            .entry(key.to_string())
            .or_insert_with(|| Rc::new(texture))
            .clone()
    }
}

impl Default for TexturePool {
    fn default() -> Self {
        Self::new()
    }
}
