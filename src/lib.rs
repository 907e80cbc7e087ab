#![warn(missing_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxelstream
//!
//! A streaming, bounded-memory voxel renderer: a fixed-size toroidal voxel
//! buffer is kept centered on a moving first-person camera, and a
//! visibility-ordered traversal culls invisible geometry so only a bounded
//! number of voxel faces reach the graphics backend per frame.
//!
//! ## Key Modules
//!
//! * `scene` - The scene container, its camera and the component lifecycle
//! * `voxels` - Voxel cells and the toroidal volume that stores them
//! * `streaming` - Keeps the volume centered on the camera with incremental
//!   slab reloads through a pluggable content generator
//! * `rendering` - The perspective traversal renderer with neighbor
//!   occlusion culling and distance-based detail tiers
//! * `resources` - Load-once shader and texture caches
//! * `content` - Demo shape generators used to fill the volume
//! * `viewer` - A headless demo loop driving all of the above
//!
//! ## Architecture
//!
//! The crate separates world-side computation from the graphics backend:
//! streaming and traversal are pure operations over in-memory state, and
//! every visible voxel leaves the renderer as a draw request through the
//! [`FacePrimitive`](rendering::primitive::FacePrimitive) contract. Window
//! management, GPU resource binding and draw submission are the embedding
//! application's job.
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     if let Err(err) = voxelstream::run() {
//!         eprintln!("error: {err}");
//!     }
//! }
//! ```

use log::info;

pub mod content;
pub mod error;
pub mod rendering;
pub mod resources;
pub mod scene;
pub mod streaming;
pub mod viewer;
pub mod voxels;

pub use error::EngineError;

/// Runs the headless viewer with configuration taken from the command
/// line: an optional `.json` configuration path followed by optional
/// surface and relief texture paths.
pub fn run() -> Result<(), EngineError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();
    info!("Logger initialized");

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let mut config = if args.first().is_some_and(|a| a.ends_with(".json")) {
        viewer::ViewerConfig::load(&args.remove(0))?
    } else {
        viewer::ViewerConfig::default()
    };
    if let Some(surface) = args.first() {
        config.surface_texture = Some(surface.clone());
    }
    if let Some(relief) = args.get(1) {
        config.relief_texture = Some(relief.clone());
    }

    viewer::run_viewer(config)
}
