//! Image decoding and fitting utilities.

use image::{imageops, RgbaImage};
use inpaint_core::{SourceImage, Surface};

use crate::error::{RenderError, RenderResult};

/// Decode a source image to RGBA pixels.
///
/// # Errors
///
/// Returns an error if the bytes cannot be decoded.
pub fn decode_source(source: &SourceImage) -> RenderResult<RgbaImage> {
    let img = image::load_from_memory(source.bytes())
        .map_err(|e| RenderError::Decode(format!("{}: {e}", source.file_name())))?;
    Ok(img.to_rgba8())
}

/// Decode an encoded image (e.g. an exported mask) into a [`Surface`].
///
/// # Errors
///
/// Returns an error if the image cannot be decoded.
pub fn decode_surface(data: &[u8]) -> RenderResult<Surface> {
    let rgba = image::load_from_memory(data)
        .map_err(|e| RenderError::Decode(e.to_string()))?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(Surface::from_raw(width, height, rgba.into_raw())?)
}

/// Placement of a fitted image inside a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Left offset in the frame.
    pub x: u32,
    /// Top offset in the frame.
    pub y: u32,
    /// Scaled width.
    pub width: u32,
    /// Scaled height.
    pub height: u32,
}

/// Scale `(width, height)` to fit entirely inside the frame while
/// preserving aspect ratio, centred on both axes.
///
/// Images smaller than the frame are scaled up.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn contain(width: u32, height: u32, frame_width: u32, frame_height: u32) -> Placement {
    let scale_x = f64::from(frame_width) / f64::from(width.max(1));
    let scale_y = f64::from(frame_height) / f64::from(height.max(1));
    let scale = scale_x.min(scale_y);

    let fitted_w = ((f64::from(width) * scale).round() as u32).clamp(1, frame_width);
    let fitted_h = ((f64::from(height) * scale).round() as u32).clamp(1, frame_height);

    Placement {
        x: (frame_width - fitted_w) / 2,
        y: (frame_height - fitted_h) / 2,
        width: fitted_w,
        height: fitted_h,
    }
}

/// Resize `img` into a `frame_width` x `frame_height` canvas using
/// [`contain`] placement over a solid `background`.
#[must_use]
pub fn fit_into_frame(
    img: &RgbaImage,
    frame_width: u32,
    frame_height: u32,
    background: [u8; 4],
) -> RgbaImage {
    let placement = contain(img.width(), img.height(), frame_width, frame_height);
    let resized = imageops::resize(
        img,
        placement.width,
        placement.height,
        imageops::FilterType::Lanczos3,
    );

    let mut frame = RgbaImage::from_pixel(frame_width, frame_height, image::Rgba(background));
    imageops::overlay(
        &mut frame,
        &resized,
        i64::from(placement.x),
        i64::from(placement.y),
    );
    frame
}
