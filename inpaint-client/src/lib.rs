//! # Inpaint Client
//!
//! Headless host for the inpaint masking workflow: loads a source image,
//! replays brush strokes onto the preview and mask surfaces, and uploads
//! the mask to the inpainting service.
//!
//! ## Usage
//!
//! ```bash
//! inpaint-mask --image photo.jpg --strokes strokes.json --mask-out mask.png --no-upload
//! ```
//!
//! ## With the inpainting service:
//!
//! ```bash
//! INPAINT_BASE_URL=http://localhost:8000/api/ inpaint-mask --image photo.jpg --strokes strokes.json
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `ClientConfig` - Canvas size, brush, outputs and service connection
//! - `InpaintApp` - Painting state plus the encode → upload sequence
//! - `Uploader` - Multipart upload over an injectable `HttpTransport`

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod transport;

pub use app::{ExportJob, InpaintApp, Notification};
pub use transport::{
    upload_endpoint, FilePart, HttpResponse, HttpTransport, ReqwestTransport, UploadError,
    UploadForm, Uploader, DEFAULT_DESCRIPTION, UPLOAD_PATH,
};

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use inpaint_core::brush::DEFAULT_BRUSH_RADIUS;
use inpaint_core::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
use inpaint_renderer::MaskChannels;

/// Mask channel layout selectable on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum MaskFormat {
    /// 8-bit RGBA.
    #[default]
    Rgba,
    /// 8-bit grayscale.
    Luma,
}

impl From<MaskFormat> for MaskChannels {
    fn from(value: MaskFormat) -> Self {
        match value {
            MaskFormat::Rgba => Self::Rgba,
            MaskFormat::Luma => Self::Luma,
        }
    }
}

/// Command-line arguments for inpaint-mask.
#[derive(Debug, Clone, Parser)]
#[command(name = "inpaint-mask")]
#[command(about = "Paint an inpainting mask over an image and upload it")]
#[command(version)]
pub struct CliArgs {
    /// Source image (PNG or JPEG)
    #[arg(long)]
    pub image: PathBuf,

    /// JSON stroke script to replay onto the canvas
    #[arg(long)]
    pub strokes: Option<PathBuf>,

    /// Initial brush radius in pixels (5-50)
    #[arg(long, default_value_t = DEFAULT_BRUSH_RADIUS)]
    pub brush: u32,

    /// Canvas width in pixels
    #[arg(long, default_value_t = DEFAULT_CANVAS_WIDTH)]
    pub width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = DEFAULT_CANVAS_HEIGHT)]
    pub height: u32,

    /// Fill gaps between pointer moves with interpolated stamps
    #[arg(long)]
    pub interpolate: bool,

    /// Inpainting service base URL (e.g., <http://localhost:8000/api/>)
    #[arg(long, env = "INPAINT_BASE_URL")]
    pub base_url: Option<String>,

    /// Description sent with the upload
    #[arg(long, default_value = DEFAULT_DESCRIPTION)]
    pub description: String,

    /// Write the encoded mask to this path
    #[arg(long)]
    pub mask_out: Option<PathBuf>,

    /// Write the translucent preview overlay to this path
    #[arg(long)]
    pub preview_out: Option<PathBuf>,

    /// Write the source with the overlay composited on top to this path
    #[arg(long)]
    pub display_out: Option<PathBuf>,

    /// Channel layout of the encoded mask
    #[arg(long, value_enum, default_value_t = MaskFormat::Rgba)]
    pub mask_channels: MaskFormat,

    /// Skip the upload step
    #[arg(long)]
    pub no_upload: bool,
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Source image path.
    pub image: Option<PathBuf>,
    /// Stroke script path.
    pub strokes: Option<PathBuf>,
    /// Initial brush radius.
    pub brush: u32,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Interpolate between pointer moves.
    pub interpolate: bool,
    /// Inpainting service base URL.
    pub base_url: Option<String>,
    /// Upload description.
    pub description: String,
    /// Mask output path.
    pub mask_out: Option<PathBuf>,
    /// Preview output path.
    pub preview_out: Option<PathBuf>,
    /// Display composite output path.
    pub display_out: Option<PathBuf>,
    /// Mask channel layout.
    pub mask_channels: MaskChannels,
    /// Whether to upload after painting.
    pub upload: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            image: None,
            strokes: None,
            brush: DEFAULT_BRUSH_RADIUS,
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
            interpolate: false,
            base_url: None,
            description: DEFAULT_DESCRIPTION.to_string(),
            mask_out: None,
            preview_out: None,
            display_out: None,
            mask_channels: MaskChannels::Rgba,
            upload: true,
        }
    }
}

impl From<CliArgs> for ClientConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            image: Some(args.image),
            strokes: args.strokes,
            brush: args.brush,
            width: args.width,
            height: args.height,
            interpolate: args.interpolate,
            base_url: args.base_url,
            description: args.description,
            mask_out: args.mask_out,
            preview_out: args.preview_out,
            display_out: args.display_out,
            mask_channels: args.mask_channels.into(),
            upload: !args.no_upload,
        }
    }
}
