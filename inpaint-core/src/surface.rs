//! In-memory RGBA8 pixel surfaces.

use crate::brush::Stamp;
use crate::{MaskError, MaskResult};

/// An RGBA color with 8 bits per channel (straight alpha).
pub type Rgba = [u8; 4];

/// Fully transparent black.
pub const TRANSPARENT: Rgba = [0, 0, 0, 0];
/// Opaque black.
pub const OPAQUE_BLACK: Rgba = [0, 0, 0, 255];
/// Opaque white.
pub const OPAQUE_WHITE: Rgba = [255, 255, 255, 255];

/// Largest width or height a surface may have.
pub const MAX_SURFACE_DIMENSION: u32 = 8192;

/// A fixed-size RGBA8 pixel grid in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Surface {
    /// Create a surface filled with `color`.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::InvalidDimensions`] if either dimension is zero
    /// or larger than [`MAX_SURFACE_DIMENSION`].
    pub fn new(width: u32, height: u32, color: Rgba) -> MaskResult<Self> {
        if width > MAX_SURFACE_DIMENSION || height > MAX_SURFACE_DIMENSION {
            return Err(MaskError::InvalidDimensions { width, height });
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .filter(|&n| n > 0)
            .ok_or(MaskError::InvalidDimensions { width, height })?;

        let mut surface = Self {
            width,
            height,
            pixels: vec![0; len],
        };
        surface.fill(color);
        Ok(surface)
    }

    /// Wrap an existing row-major RGBA buffer.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::InvalidDimensions`] if the buffer length does not
    /// match `width * height * 4` or either dimension is zero.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> MaskResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4));
        if expected != Some(pixels.len()) || pixels.is_empty() {
            return Err(MaskError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` in pixels.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(((y as usize) * (self.width as usize) + (x as usize)) * 4)
    }

    /// Read the pixel at `(x, y)`, or `None` if out of bounds.
    #[must_use]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let i = self.offset(x, y)?;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    /// Fill every pixel with `color`.
    pub fn fill(&mut self, color: Rgba) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&color);
        }
    }

    /// Replace every pixel covered by `stamp` with `color`.
    ///
    /// Returns the number of pixels written; zero when the disc is entirely
    /// off-surface.
    pub fn fill_disc(&mut self, stamp: &Stamp, color: Rgba) -> usize {
        self.for_each_covered(stamp, |px| px.copy_from_slice(&color))
    }

    /// Composite `color` over every pixel covered by `stamp` (source-over).
    ///
    /// Each call is blended independently, so overlapping discs accumulate.
    pub fn blend_disc(&mut self, stamp: &Stamp, color: Rgba) -> usize {
        self.for_each_covered(stamp, |px| {
            let dst = [px[0], px[1], px[2], px[3]];
            px.copy_from_slice(&blend_over(dst, color));
        })
    }

    fn for_each_covered(&mut self, stamp: &Stamp, mut apply: impl FnMut(&mut [u8])) -> usize {
        let Some(bounds) = stamp.pixel_bounds(self.width, self.height) else {
            return 0;
        };

        let mut written = 0;
        for y in bounds.y_min..bounds.y_max {
            for x in bounds.x_min..bounds.x_max {
                if !stamp.covers(x, y) {
                    continue;
                }
                if let Some(i) = self.offset(x, y) {
                    apply(&mut self.pixels[i..i + 4]);
                    written += 1;
                }
            }
        }
        written
    }

    /// Number of pixels exactly equal to `color`.
    #[must_use]
    pub fn count_matching(&self, color: Rgba) -> usize {
        self.pixels
            .chunks_exact(4)
            .filter(|px| *px == color.as_slice())
            .count()
    }

    /// Raw RGBA bytes in row-major order.
    #[must_use]
    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }
}

/// Source-over composite of straight-alpha `src` onto `dst`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn blend_over(dst: Rgba, src: Rgba) -> Rgba {
    let sa = f32::from(src[3]) / 255.0;
    let da = f32::from(dst[3]) / 255.0;
    let out_a = da.mul_add(1.0 - sa, sa);

    if out_a <= 0.0 {
        return TRANSPARENT;
    }

    let channel = |s: u8, d: u8| {
        let s = f32::from(s) / 255.0;
        let d = f32::from(d) / 255.0;
        let c = (d * da).mul_add(1.0 - sa, s * sa) / out_a;
        (c * 255.0).round().clamp(0.0, 255.0) as u8
    };

    [
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ]
}
