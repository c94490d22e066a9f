//! Dual-surface compositor.
//!
//! Owns the preview and mask surfaces and applies every brush stamp to
//! both of them, so they always cover the same set of pixels:
//!
//! ```text
//! stamp(center, radius)
//!        │
//!        ├──► Preview: white @ 50% alpha, source-over (accumulates)
//!        │
//!        └──► Mask:    opaque white, replace (idempotent)
//! ```

use crate::brush::Stamp;
use crate::surface::{Rgba, Surface, OPAQUE_BLACK, OPAQUE_WHITE, TRANSPARENT};
use crate::MaskResult;

/// Paint used for the translucent preview highlight.
pub const PREVIEW_PAINT: Rgba = [255, 255, 255, 128];
/// Paint used for selected mask pixels.
pub const MASK_PAINT: Rgba = OPAQUE_WHITE;
/// Background of a freshly initialised mask.
pub const MASK_BACKGROUND: Rgba = OPAQUE_BLACK;
/// Background of a freshly initialised preview.
pub const PREVIEW_BACKGROUND: Rgba = TRANSPARENT;

/// Preview and mask surfaces of identical size, mutated together.
#[derive(Debug, Clone)]
pub struct Compositor {
    preview: Surface,
    mask: Surface,
    stamp_count: u64,
}

impl Compositor {
    /// Allocate both surfaces: preview transparent, mask opaque black.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are invalid.
    pub fn init_surfaces(width: u32, height: u32) -> MaskResult<Self> {
        tracing::debug!("Initialising {width}x{height} preview and mask surfaces");
        Ok(Self {
            preview: Surface::new(width, height, PREVIEW_BACKGROUND)?,
            mask: Surface::new(width, height, MASK_BACKGROUND)?,
            stamp_count: 0,
        })
    }

    /// Apply one stamp to both surfaces.
    ///
    /// Returns the number of pixels covered (identical on both surfaces).
    pub fn stamp(&mut self, stamp: &Stamp) -> usize {
        let painted = self.preview.blend_disc(stamp, PREVIEW_PAINT);
        let masked = self.mask.fill_disc(stamp, MASK_PAINT);
        debug_assert_eq!(painted, masked);

        self.stamp_count += 1;
        tracing::trace!(
            "Stamp #{} at ({:.1}, {:.1}) r={} covered {masked} px",
            self.stamp_count,
            stamp.center.x,
            stamp.center.y,
            stamp.radius
        );
        masked
    }

    /// Discard all strokes, returning both surfaces to their initial state.
    pub fn clear(&mut self) {
        self.preview.fill(PREVIEW_BACKGROUND);
        self.mask.fill(MASK_BACKGROUND);
        self.stamp_count = 0;
        tracing::debug!("Surfaces cleared");
    }

    /// The translucent preview overlay.
    #[must_use]
    pub fn preview(&self) -> &Surface {
        &self.preview
    }

    /// The binary mask.
    #[must_use]
    pub fn mask(&self) -> &Surface {
        &self.mask
    }

    /// Shared `(width, height)` of both surfaces.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.mask.dimensions()
    }

    /// Stamps applied since initialisation or the last clear.
    #[must_use]
    pub fn stamp_count(&self) -> u64 {
        self.stamp_count
    }

    /// Number of selected (white) mask pixels.
    #[must_use]
    pub fn selected_pixels(&self) -> usize {
        self.mask.count_matching(MASK_PAINT)
    }
}
