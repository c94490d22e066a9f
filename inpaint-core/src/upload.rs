//! Result of a successful mask upload.

use serde::{Deserialize, Serialize};

/// URLs returned by the inpainting service for an uploaded image pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    /// Where the service stored the original image.
    pub original_image_url: String,
    /// Where the service stored the mask.
    pub mask_image_url: String,
}

impl UploadResult {
    /// Labelled image URLs in display order (original first, then mask).
    #[must_use]
    pub fn display_entries(&self) -> [(&'static str, &str); 2] {
        [
            ("Original Image", self.original_image_url.as_str()),
            ("Mask Image", self.mask_image_url.as_str()),
        ]
    }
}
