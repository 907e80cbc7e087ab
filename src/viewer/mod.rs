//! # Viewer Module
//!
//! A headless scene viewer: builds a scene around a scripted camera flight,
//! streams the selected demo shape through the volume and renders every
//! frame into a counting primitive, logging what a windowed build would put
//! on screen. Runtime parameters come from an optional JSON configuration
//! file plus command-line texture selection.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use cgmath::Point3;
use log::info;
use serde::Deserialize;

use crate::content::{shape_generator, Shape, ShapeExtent};
use crate::error::EngineError;
use crate::rendering::primitive::CountingPrimitive;
use crate::rendering::{PerspectiveRenderer, VoxelType};
use crate::resources::texture::Texture;
use crate::resources::ResourcePool;
use crate::scene::camera::Camera;
use crate::scene::{Scene, SharedComponent};
use crate::streaming::StreamingComponent;

/// Pool key of the built-in texture used when no file is selected.
const BUILTIN_TEXTURE: &str = "builtin:checker";

/// Runtime parameters of the viewer.
///
/// Every field has a sensible default, so a configuration file only needs
/// the values it changes. Shape and extent are numeric selectors
/// (shape: 0 plane, 1 solid cube, 2 wire cube, 3 sphere, 4 terrain,
/// 5 scatter; extent: 0 ten, 1 hundred, 2 thousand, 3 infinite).
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Vertical field of view, degrees.
    pub fov: f32,
    /// Near plane distance.
    pub near: f32,
    /// Far plane distance.
    pub far: f32,
    /// Middle detail tier threshold, fraction of `far`.
    pub middle_lod: f32,
    /// Far detail tier threshold, fraction of `far`.
    pub far_lod: f32,
    /// Demo shape selector.
    pub shape: u8,
    /// Demo shape extent selector.
    pub shape_extent: u8,
    /// Number of frames to simulate.
    pub frames: u32,
    /// Camera speed in cells per second.
    pub camera_speed: f32,
    /// Viewport width used for the aspect ratio.
    pub screen_width: f32,
    /// Viewport height used for the aspect ratio.
    pub screen_height: f32,
    /// Path of the surface texture; built-in checkerboard when absent.
    pub surface_texture: Option<String>,
    /// Path of the relief texture; built-in checkerboard when absent.
    pub relief_texture: Option<String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            fov: 30.0,
            near: 2.0,
            far: 50.0,
            middle_lod: 0.75,
            far_lod: 0.95,
            shape: 0,
            shape_extent: 3,
            frames: 600,
            camera_speed: 10.0,
            screen_width: 1200.0,
            screen_height: 796.0,
            surface_texture: None,
            relief_texture: None,
        }
    }
}

impl ViewerConfig {
    /// Parses a configuration from JSON text.
    pub fn from_json(path: &str, text: &str) -> Result<Self, EngineError> {
        serde_json::from_str(text).map_err(|source| EngineError::ConfigParse {
            path: path.to_string(),
            source,
        })
    }

    /// Loads a configuration file.
    pub fn load(path: &str) -> Result<Self, EngineError> {
        let text = std::fs::read_to_string(path).map_err(|source| EngineError::ConfigRead {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(path, &text)
    }
}

/// Resolves a texture selection to a pool key, seeding the built-in
/// fallback when no file was selected.
fn texture_key(pool: &mut ResourcePool, selection: &Option<String>) -> String {
    match selection {
        Some(path) => path.clone(),
        None => {
            pool.insert_texture(BUILTIN_TEXTURE, Texture::checkerboard(64));
            BUILTIN_TEXTURE.to_string()
        }
    }
}

/// Runs the headless viewer to completion.
pub fn run_viewer(config: ViewerConfig) -> Result<(), EngineError> {
    let shape = Shape::from_selector(config.shape)?;
    let extent = ShapeExtent::from_selector(config.shape_extent)?;

    let mut pool = ResourcePool::new();
    let surface = texture_key(&mut pool, &config.surface_texture);
    let relief = texture_key(&mut pool, &config.relief_texture);

    let camera = Camera::new(45.0, 0.0, Point3::new(-4.5, -4.5, 3.25));
    let mut scene = Scene::new(camera);

    let streamer = Rc::new(RefCell::new(StreamingComponent::new()));
    let renderer = Rc::new(RefCell::new(PerspectiveRenderer::new(
        &mut pool,
        config.screen_width,
        config.screen_height,
    )?));
    {
        let mut renderer = renderer.borrow_mut();
        renderer.fov = config.fov;
        renderer.near = config.near;
        renderer.far = config.far;
        renderer.middle_lod = config.middle_lod;
        renderer.far_lod = config.far_lod;
    }
    scene.insert_component(streamer.clone() as SharedComponent);
    scene.insert_component(renderer.clone() as SharedComponent);

    let voxel = renderer.borrow_mut().insert_voxel_type(
        &mut pool,
        &VoxelType::new().with_surface(surface).with_relief(relief),
    )?;

    info!("streaming {shape:?} ({extent:?}) around the camera");
    streamer
        .borrow_mut()
        .set_generator(shape_generator(shape, extent, voxel));
    streamer.borrow_mut().reset(scene.context_mut());

    let mut primitive = CountingPrimitive::new();
    let dt = 1.0 / 60.0;
    let started = Instant::now();
    let mut total_voxels: u64 = 0;

    for frame in 0..config.frames {
        {
            let camera = &mut scene.context_mut().camera;
            camera.move_forward(dt * config.camera_speed);
            camera.rotate_by(dt * 3.0, 0.0);
        }
        scene.update(dt);
        let rendered = renderer.borrow_mut().render(scene.context(), &mut primitive);
        total_voxels += u64::from(rendered);
        if frame % 60 == 0 {
            info!(
                "frame {frame}: {rendered} voxels, {} faces, center {:?}",
                primitive.faces(),
                streamer.borrow().center()
            );
            primitive.reset();
        }
    }

    let elapsed = started.elapsed();
    info!(
        "{} frames in {:.2?} ({:.1} voxels/frame average)",
        config.frames,
        elapsed,
        total_voxels as f64 / f64::from(config.frames.max(1))
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_cover_every_tweak() {
        let config = ViewerConfig::default();
        assert_eq!(config.fov, 30.0);
        assert_eq!(config.far, 50.0);
        assert_eq!(config.middle_lod, 0.75);
        assert_eq!(config.far_lod, 0.95);
        assert_eq!(config.shape_extent, 3);
    }

    #[test]
    fn partial_config_keeps_defaults_for_the_rest() {
        let config =
            ViewerConfig::from_json("test.json", r#"{"far": 80.0, "shape": 3}"#).unwrap();
        assert_eq!(config.far, 80.0);
        assert_eq!(config.shape, 3);
        assert_eq!(config.fov, 30.0);
    }

    #[test]
    fn malformed_config_names_the_file() {
        let err = ViewerConfig::from_json("broken.json", "{far:").unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn short_run_streams_and_renders() {
        let config = ViewerConfig {
            frames: 10,
            ..ViewerConfig::default()
        };
        run_viewer(config).unwrap();
    }
}
