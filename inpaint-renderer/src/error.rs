//! Renderer error types.

use inpaint_core::MaskError;
use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while encoding or compositing surfaces.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Raster encoding failed.
    #[error("Encoding failed: {0}")]
    Encode(String),

    /// Image decoding failed.
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// Pixel buffer could not be wrapped.
    #[error("Surface error: {0}")]
    Surface(#[from] MaskError),
}
