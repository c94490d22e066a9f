//! # Inpaint Renderer
//!
//! Lossless raster export for the painting surfaces.
//!
//! ## Outputs
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               MaskExporter                  │
//! ├──────────────┬──────────────┬───────────────┤
//! │ Mask PNG     │ Preview PNG  │ Display PNG   │
//! │ (upload)     │ (overlay)    │ (source+      │
//! │              │              │  overlay)     │
//! └──────────────┴──────────────┴───────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod export;
pub mod image;

pub use error::{RenderError, RenderResult};
pub use export::{
    Compression, ExportConfig, MaskArtifact, MaskChannels, MaskEncoder, MaskExporter, MASK_FILE_NAME,
    PNG_MIME,
};
