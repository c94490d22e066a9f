//! Headless masking application.
//!
//! Owns the painting state and the exporter, replays input, and runs the
//! encode → upload sequence that backs the export action.

use inpaint_core::{
    CanvasRect, InputEvent, MaskResult, MaskingState, SourceImage, UploadResult,
};
use inpaint_renderer::{ExportConfig, MaskArtifact, MaskEncoder, MaskExporter, RenderError};

use crate::transport::{HttpTransport, UploadError, Uploader};
use crate::ClientConfig;

/// Outcome of an export attempt, as reported to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Upload accepted; the returned URLs.
    Success(UploadResult),
    /// Encoding or upload failed; human-readable reason.
    Failure(String),
    /// Nothing to export (no source image loaded).
    Skipped,
}

impl Notification {
    /// Whether the export succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// One-line message for the user, if any.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Success(_) => Some("Image uploaded successfully!".to_string()),
            Self::Failure(reason) => Some(format!("Upload failed: {reason}")),
            Self::Skipped => None,
        }
    }
}

/// Everything an upload needs, captured at export time.
///
/// Holding a job does not borrow the application, so painting can
/// continue while the request is in flight.
#[derive(Debug, Clone)]
pub struct ExportJob {
    source: SourceImage,
    mask: MaskArtifact,
}

impl ExportJob {
    /// The source image being uploaded.
    #[must_use]
    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    /// The encoded mask.
    #[must_use]
    pub fn mask(&self) -> &MaskArtifact {
        &self.mask
    }

    /// Send the job through `uploader`.
    ///
    /// # Errors
    ///
    /// Returns the upload error unchanged.
    pub async fn send<T: HttpTransport>(
        self,
        uploader: &Uploader<T>,
    ) -> Result<UploadResult, UploadError> {
        uploader.upload(&self.source, self.mask).await
    }
}

/// The masking application.
///
/// Generic over the mask encoder; [`MaskExporter`] unless replaced with
/// [`InpaintApp::with_encoder`].
#[derive(Debug, Clone)]
pub struct InpaintApp<E = MaskExporter> {
    state: MaskingState,
    exporter: E,
    rect: CanvasRect,
    width: u32,
    height: u32,
}

impl InpaintApp {
    /// Create an application from its configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured brush radius is out of range.
    pub fn new(config: &ClientConfig) -> MaskResult<Self> {
        let exporter = MaskExporter::new(ExportConfig {
            mask_channels: config.mask_channels,
            ..ExportConfig::default()
        });
        Self::with_encoder(config, exporter)
    }
}

impl<E: MaskEncoder> InpaintApp<E> {
    /// Create an application that encodes masks with `exporter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured brush radius is out of range.
    #[allow(clippy::cast_precision_loss)] // Canvas dimensions fit in f32
    pub fn with_encoder(config: &ClientConfig, exporter: E) -> MaskResult<Self> {
        let mut state = MaskingState::new(config.interpolate);
        state.set_brush_radius(config.brush)?;

        Ok(Self {
            state,
            exporter,
            rect: CanvasRect::at_origin(config.width as f32, config.height as f32),
            width: config.width,
            height: config.height,
        })
    }

    /// Painting state.
    #[must_use]
    pub fn state(&self) -> &MaskingState {
        &self.state
    }

    /// The mask encoder.
    #[must_use]
    pub fn exporter(&self) -> &E {
        &self.exporter
    }

    /// Load a new source image onto fresh surfaces.
    ///
    /// # Errors
    ///
    /// Returns an error if the canvas dimensions are invalid.
    pub fn load_image(&mut self, source: SourceImage) -> MaskResult<()> {
        self.state.load_source(source, self.width, self.height)
    }

    /// Apply one input event. Returns the number of stamps applied.
    ///
    /// # Errors
    ///
    /// Returns an error if a brush event carries an out-of-range radius.
    pub fn handle_event(&mut self, event: &InputEvent) -> MaskResult<usize> {
        self.state.process_event(event, &self.rect)
    }

    /// Apply a sequence of events in order. Returns the total stamps applied.
    ///
    /// # Errors
    ///
    /// Stops at the first event that fails.
    pub fn replay(&mut self, events: &[InputEvent]) -> MaskResult<usize> {
        let mut stamps = 0;
        for event in events {
            stamps += self.handle_event(event)?;
        }
        tracing::debug!("Replayed {} events ({stamps} stamps)", events.len());
        Ok(stamps)
    }

    /// Change the brush radius.
    ///
    /// # Errors
    ///
    /// Returns an error if `radius` is out of range.
    pub fn set_brush(&mut self, radius: u32) -> MaskResult<()> {
        self.state.set_brush_radius(radius)
    }

    /// Discard all strokes.
    pub fn clear(&mut self) {
        self.state.clear();
    }

    /// Encode the mask and capture the source for upload.
    ///
    /// Returns `Ok(None)` when no source image is loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if mask encoding fails; nothing must be sent then.
    pub fn prepare_export(&self) -> Result<Option<ExportJob>, RenderError> {
        let Ok((source, compositor)) = self.state.export_inputs() else {
            tracing::debug!("Export requested with no source image loaded");
            return Ok(None);
        };

        let mask = self.exporter.encode_mask(compositor.mask())?;
        Ok(Some(ExportJob {
            source: source.clone(),
            mask,
        }))
    }

    /// Record the outcome of an upload and turn it into a notification.
    pub fn finish_export(&mut self, outcome: Result<UploadResult, UploadError>) -> Notification {
        match outcome {
            Ok(result) => {
                tracing::info!(
                    "Upload succeeded: original={} mask={}",
                    result.original_image_url,
                    result.mask_image_url
                );
                self.state.record_upload(result.clone());
                Notification::Success(result)
            }
            Err(e) => {
                tracing::error!("Upload failed: {e}");
                Notification::Failure(e.to_string())
            }
        }
    }

    /// Encode the mask and upload it with the source image.
    ///
    /// Failures leave the surfaces and stroke session untouched.
    pub async fn export<T: HttpTransport>(&mut self, uploader: &Uploader<T>) -> Notification {
        let job = match self.prepare_export() {
            Ok(Some(job)) => job,
            Ok(None) => return Notification::Skipped,
            Err(e) => return self.finish_export(Err(UploadError::Encode(e))),
        };

        tracing::info!(
            "Uploading {} with {}x{} mask to {}",
            job.source.file_name(),
            self.width,
            self.height,
            uploader.endpoint()
        );
        let outcome = job.send(uploader).await;
        self.finish_export(outcome)
    }

    /// The last successful upload as labelled lines.
    #[must_use]
    pub fn display_lines(&self) -> Vec<String> {
        self.state
            .last_upload()
            .map(|result| {
                result
                    .display_entries()
                    .iter()
                    .map(|(label, url)| format!("{label}: {url}"))
                    .collect()
            })
            .unwrap_or_default()
    }
}
