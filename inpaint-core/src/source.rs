//! Source image reference.
//!
//! Supports loading the user-selected original from byte buffers, files,
//! and base64 or percent-encoded data URIs.

use std::path::Path;
use std::sync::Arc;

use crate::{MaskError, MaskResult};

/// Source image formats the file picker accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG.
    Png,
    /// JPEG.
    Jpeg,
}

impl ImageFormat {
    /// Detect format from file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Detect format from MIME type.
    #[must_use]
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.to_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        None
    }

    /// Canonical MIME type.
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Canonical file extension.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

/// Immutable handle to the user-selected original image.
///
/// Cloning shares the underlying bytes; nothing is copied until the upload
/// transport builds its request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    file_name: String,
    format: ImageFormat,
    bytes: Arc<[u8]>,
}

impl SourceImage {
    /// Wrap raw file bytes.
    ///
    /// The format is sniffed from the bytes, falling back to the file
    /// name's extension.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::UnsupportedFormat`] if the bytes are neither PNG
    /// nor JPEG, or [`MaskError::ResourceLoad`] if they are empty.
    pub fn from_bytes(file_name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> MaskResult<Self> {
        let file_name = file_name.into();
        let bytes = bytes.into();

        if bytes.is_empty() {
            return Err(MaskError::ResourceLoad(format!("{file_name} is empty")));
        }

        let format = ImageFormat::from_magic_bytes(&bytes)
            .or_else(|| {
                Path::new(&file_name)
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .and_then(ImageFormat::from_extension)
            })
            .ok_or_else(|| MaskError::UnsupportedFormat(file_name.clone()))?;

        tracing::debug!(
            "Source image {file_name}: {} bytes, {}",
            bytes.len(),
            format.mime()
        );

        Ok(Self {
            file_name,
            format,
            bytes,
        })
    }

    /// Read a source image from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not PNG/JPEG.
    pub fn from_path(path: impl AsRef<Path>) -> MaskResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        Self::from_bytes(file_name, bytes)
    }

    /// Load a source image from a data URI.
    ///
    /// Supports formats like: `data:image/png;base64,iVBORw0KGgo...`
    ///
    /// # Errors
    ///
    /// Returns an error if the data URI is malformed or the payload is not
    /// PNG/JPEG.
    pub fn from_data_uri(uri: &str) -> MaskResult<Self> {
        let uri_data = uri
            .strip_prefix("data:")
            .ok_or_else(|| MaskError::ResourceLoad("Not a data URI".to_string()))?;

        let (metadata, encoded_data) = uri_data
            .split_once(',')
            .ok_or_else(|| MaskError::ResourceLoad("Invalid data URI: missing comma".to_string()))?;

        let bytes = if metadata.contains(";base64") {
            use base64::Engine;
            base64::engine::general_purpose::STANDARD
                .decode(encoded_data)
                .map_err(|e| MaskError::ResourceLoad(format!("Failed to decode base64: {e}")))?
        } else {
            percent_decode(encoded_data)?
        };

        let extension = metadata
            .split(';')
            .next()
            .and_then(ImageFormat::from_mime)
            .map_or("bin", ImageFormat::extension);

        Self::from_bytes(format!("image.{extension}"), bytes)
    }

    /// Original file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Detected format.
    #[must_use]
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// MIME type of the original bytes.
    #[must_use]
    pub fn mime(&self) -> &'static str {
        self.format.mime()
    }

    /// The original file bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Percent-decoding for non-base64 data URIs.
fn percent_decode(input: &str) -> MaskResult<Vec<u8>> {
    let bytes = input.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let byte = input
                .get(i + 1..i + 3)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .ok_or_else(|| MaskError::ResourceLoad("Invalid URL encoding".to_string()))?;
            result.push(byte);
            i += 3;
        } else {
            result.push(bytes[i]);
            i += 1;
        }
    }

    Ok(result)
}
