//! Surface export to lossless raster formats.
//!
//! Encodes the mask for upload, the preview overlay on its own, and the
//! display composite (source image with the overlay on top) as PNG.

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{imageops, ExtendedColorType, ImageEncoder, RgbaImage};
use inpaint_core::{SourceImage, Surface};

use crate::error::{RenderError, RenderResult};
use crate::image::{decode_source, fit_into_frame};

/// File name the mask is uploaded under.
pub const MASK_FILE_NAME: &str = "mask.png";
/// MIME type of every exported image.
pub const PNG_MIME: &str = "image/png";

/// Channel layout of the encoded mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MaskChannels {
    /// 8-bit RGBA, as a browser canvas exports it.
    #[default]
    Rgba,
    /// 8-bit grayscale.
    Luma,
}

/// PNG compression effort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// Fast encoding, larger files.
    Fast,
    /// Balanced default.
    #[default]
    Default,
    /// Smallest files, slowest encoding.
    Best,
}

impl From<Compression> for CompressionType {
    fn from(value: Compression) -> Self {
        match value {
            Compression::Fast => Self::Fast,
            Compression::Default => Self::Default,
            Compression::Best => Self::Best,
        }
    }
}

/// Configuration for surface export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Channel layout of the encoded mask (default: RGBA).
    pub mask_channels: MaskChannels,
    /// PNG compression effort.
    pub compression: Compression,
    /// Letterbox colour behind the source image in the display composite.
    pub display_background: [u8; 4],
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            mask_channels: MaskChannels::Rgba,
            compression: Compression::Default,
            display_background: [0, 0, 0, 0],
        }
    }
}

/// An encoded mask, ready to attach to an upload.
///
/// Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskArtifact {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

impl MaskArtifact {
    /// Encoded PNG bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the artifact, returning the encoded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Pixel dimensions of the encoded mask.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Upload file name.
    #[must_use]
    pub fn file_name(&self) -> &'static str {
        MASK_FILE_NAME
    }

    /// MIME type.
    #[must_use]
    pub fn mime(&self) -> &'static str {
        PNG_MIME
    }
}

/// Turns a mask surface into an uploadable artifact.
pub trait MaskEncoder {
    /// Encode `mask` at its native resolution.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    fn encode_mask(&self, mask: &Surface) -> RenderResult<MaskArtifact>;
}

/// Encodes preview and mask surfaces.
#[derive(Debug, Clone, Default)]
pub struct MaskExporter {
    config: ExportConfig,
}

impl MaskExporter {
    /// Create a new exporter with the given configuration.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Create an exporter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ExportConfig::default())
    }

    /// Encode the mask surface at its native resolution.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails. The caller must not send an
    /// upload in that case.
    pub fn encode_mask(&self, mask: &Surface) -> RenderResult<MaskArtifact> {
        let (width, height) = mask.dimensions();
        let bytes = match self.config.mask_channels {
            MaskChannels::Rgba => {
                self.encode_png(mask.as_raw(), width, height, ExtendedColorType::Rgba8)?
            }
            MaskChannels::Luma => {
                // Mask pixels are opaque black or white, so red carries everything.
                let luma: Vec<u8> = mask.as_raw().chunks_exact(4).map(|px| px[0]).collect();
                self.encode_png(&luma, width, height, ExtendedColorType::L8)?
            }
        };

        tracing::debug!("Encoded {width}x{height} mask: {} bytes", bytes.len());
        Ok(MaskArtifact {
            bytes,
            width,
            height,
        })
    }

    /// Encode the translucent preview overlay on its own.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn encode_preview(&self, preview: &Surface) -> RenderResult<Vec<u8>> {
        let (width, height) = preview.dimensions();
        self.encode_png(preview.as_raw(), width, height, ExtendedColorType::Rgba8)
    }

    /// Render what the user sees: the source image fitted into the canvas
    /// with the preview overlay composited on top.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be decoded or the result
    /// cannot be encoded.
    pub fn compose_display(&self, source: &SourceImage, preview: &Surface) -> RenderResult<Vec<u8>> {
        let (width, height) = preview.dimensions();
        let decoded = decode_source(source)?;
        let mut frame = fit_into_frame(&decoded, width, height, self.config.display_background);

        let overlay = RgbaImage::from_raw(width, height, preview.as_raw().to_vec())
            .ok_or_else(|| RenderError::Encode("Preview buffer size mismatch".to_string()))?;
        imageops::overlay(&mut frame, &overlay, 0, 0);

        self.encode_png(frame.as_raw(), width, height, ExtendedColorType::Rgba8)
    }

    fn encode_png(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        color: ExtendedColorType,
    ) -> RenderResult<Vec<u8>> {
        let mut buf = Vec::new();
        let encoder = PngEncoder::new_with_quality(
            &mut buf,
            self.config.compression.into(),
            FilterType::Adaptive,
        );
        encoder
            .write_image(data, width, height, color)
            .map_err(|e| RenderError::Encode(format!("PNG encoding failed: {e}")))?;
        Ok(buf)
    }
}

impl MaskEncoder for MaskExporter {
    fn encode_mask(&self, mask: &Surface) -> RenderResult<MaskArtifact> {
        MaskExporter::encode_mask(self, mask)
    }
}
