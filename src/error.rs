//! Error types for icon conversion.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can abort a conversion.
///
/// Per-size variants carry the edge length being processed so a failure
/// can be traced back to the stage and size that produced it.
#[derive(Error, Debug)]
pub enum Error {
    /// The source image is missing or in an unsupported/corrupt format.
    #[error("failed to decode source image {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Resizing the source to a target size failed.
    #[error("failed to resize to {size}x{size}: {reason}")]
    Resize { size: u32, reason: String },

    /// Encoding the recolored image for a target size failed.
    #[error("failed to encode {size}x{size} image")]
    Encode {
        size: u32,
        #[source]
        source: image::ImageError,
    },

    /// The edge length cannot be stored in a directory entry's byte field.
    #[error("icon size {size} cannot be stored in a directory entry (allowed: 1-256)")]
    SizeOverflow { size: u32 },

    /// More images than the 16-bit directory count can describe.
    #[error("too many images for one icon container ({count}, max is {})", u16::MAX)]
    TooManyEntries { count: usize },

    /// A payload (or the running offset) does not fit the 32-bit fields.
    #[error("payload for {size}x{size} image is too large ({len} bytes)")]
    PayloadTooLarge { size: u32, len: usize },

    /// The assembled container could not be persisted.
    #[error("failed to write icon container to {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A container being read back is malformed.
    #[error("malformed icon container: {0}")]
    Container(io::Error),

    /// A conversion profile failed validation.
    #[error("invalid conversion profile: {0}")]
    InvalidProfile(String),

    /// A conversion profile file could not be read.
    #[error("failed to read conversion profile {}", path.display())]
    ProfileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A conversion profile could not be parsed.
    #[error("failed to parse conversion profile")]
    Profile(#[from] serde_json::Error),
}
