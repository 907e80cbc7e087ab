//! # Voxelstream Entry Point
//!
//! Runs the headless scene viewer from the command line.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- [config.json] [surface_texture [relief_texture]]
//! ```

fn main() {
    if let Err(err) = voxelstream::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
