//! Crate-wide error type.
//!
//! The core is pure computation over in-memory state, so the taxonomy is
//! narrow: configuration mistakes surface as explicit errors naming the
//! unsupported case, while API misuse (updating a detached component,
//! detaching twice) is a programmer error and panics instead.

use thiserror::Error;

/// Errors surfaced by resource lookup, content selection and the viewer.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A shader program name that is not in the built-in catalog.
    #[error("unknown shader program: {0:?}")]
    UnknownShader(String),

    /// A texture file could not be read or decoded.
    #[error("can not load texture {path:?}")]
    TextureLoad {
        /// The path that failed to load.
        path: String,
        /// The underlying decode error.
        #[source]
        source: image::ImageError,
    },

    /// A demo shape selector with no corresponding shape.
    #[error("unsupported shape selector: {0}")]
    UnsupportedShape(u8),

    /// A demo shape extent selector with no corresponding extent.
    #[error("unsupported shape extent selector: {0}")]
    UnsupportedExtent(u8),

    /// The renderer's voxel-type table has no free kind left.
    #[error("voxel type table is full")]
    VoxelTypeTableFull,

    /// A viewer configuration file could not be read.
    #[error("can not read config {path:?}")]
    ConfigRead {
        /// The path that failed to read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A viewer configuration file could not be parsed.
    #[error("can not parse config {path:?}")]
    ConfigParse {
        /// The path that failed to parse.
        path: String,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}
