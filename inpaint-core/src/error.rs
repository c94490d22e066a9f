//! Error types for painting operations.

use thiserror::Error;

/// Result type for painting operations.
pub type MaskResult<T> = Result<T, MaskError>;

/// Errors that can occur while loading, painting, or preparing an export.
#[derive(Debug, Error)]
pub enum MaskError {
    /// Brush radius outside the supported range.
    #[error("Brush radius {0} out of range (5..=50)")]
    InvalidBrushRadius(u32),

    /// Operation requires a loaded source image.
    #[error("No source image loaded")]
    NoSourceImage,

    /// Surface dimensions are unusable.
    #[error("Invalid surface dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// Source image is not a PNG or JPEG.
    #[error("Unsupported source image format: {0}")]
    UnsupportedFormat(String),

    /// Resource loading failed.
    #[error("Failed to load resource: {0}")]
    ResourceLoad(String),

    /// Filesystem error while reading a source image.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stroke script serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
