//! Painting session state management.

use crate::brush::{BrushRadius, CanvasRect, Stamp};
use crate::compositor::Compositor;
use crate::event::{InputEvent, PointerEvent, PointerPhase};
use crate::session::{StrokePhase, StrokeSession};
use crate::source::SourceImage;
use crate::upload::UploadResult;
use crate::{MaskError, MaskResult};

/// Canvas width of the painting widget.
pub const DEFAULT_CANVAS_WIDTH: u32 = 600;
/// Canvas height of the painting widget.
pub const DEFAULT_CANVAS_HEIGHT: u32 = 400;

/// The complete painting state.
///
/// All pixel mutation goes through this object: surfaces only exist while
/// a source image is loaded, so pointer input without one is a no-op.
#[derive(Debug, Clone, Default)]
pub struct MaskingState {
    source: Option<SourceImage>,
    compositor: Option<Compositor>,
    brush: BrushRadius,
    session: StrokeSession,
    last_upload: Option<UploadResult>,
}

impl MaskingState {
    /// Create an empty state.
    #[must_use]
    pub fn new(interpolate: bool) -> Self {
        Self {
            session: StrokeSession::new(interpolate),
            ..Self::default()
        }
    }

    /// Load a new source image and allocate fresh `width` x `height` surfaces.
    ///
    /// Any previous strokes are discarded and the stroke session returns to
    /// idle. The last upload result is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are invalid; the previous state is
    /// left untouched in that case.
    pub fn load_source(&mut self, source: SourceImage, width: u32, height: u32) -> MaskResult<()> {
        let compositor = Compositor::init_surfaces(width, height)?;
        tracing::info!(
            "Loaded {} ({}) onto a {width}x{height} canvas",
            source.file_name(),
            source.mime()
        );

        self.source = Some(source);
        self.compositor = Some(compositor);
        self.session.reset();
        Ok(())
    }

    /// Whether a source image is loaded.
    #[must_use]
    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// The loaded source image.
    #[must_use]
    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    /// Preview and mask surfaces, if a source is loaded.
    #[must_use]
    pub fn compositor(&self) -> Option<&Compositor> {
        self.compositor.as_ref()
    }

    /// Source and surfaces together, as required for export.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::NoSourceImage`] if nothing is loaded.
    pub fn export_inputs(&self) -> MaskResult<(&SourceImage, &Compositor)> {
        match (&self.source, &self.compositor) {
            (Some(source), Some(compositor)) => Ok((source, compositor)),
            _ => Err(MaskError::NoSourceImage),
        }
    }

    /// Current brush radius.
    #[must_use]
    pub fn brush_radius(&self) -> BrushRadius {
        self.brush
    }

    /// Change the brush radius.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::InvalidBrushRadius`] if `radius` is out of range.
    pub fn set_brush_radius(&mut self, radius: u32) -> MaskResult<()> {
        self.brush = BrushRadius::new(radius)?;
        tracing::debug!("Brush radius set to {radius}");
        Ok(())
    }

    /// Current stroke phase.
    #[must_use]
    pub fn stroke_phase(&self) -> StrokePhase {
        self.session.phase()
    }

    /// Feed a pointer event through the stroke session.
    ///
    /// Returns the number of stamps applied.
    pub fn handle_pointer(&mut self, event: &PointerEvent, rect: &CanvasRect) -> usize {
        let Some(compositor) = self.compositor.as_mut() else {
            tracing::debug!("Ignoring {:?} with no source image loaded", event.phase);
            return 0;
        };

        let point = rect.to_local(event.client_x, event.client_y);
        let surface = compositor.dimensions();
        let centers = match event.phase {
            PointerPhase::Down => self.session.pointer_down(point),
            PointerPhase::Move => self.session.pointer_move(point, self.brush, surface),
            PointerPhase::Up => {
                self.session.pointer_up();
                Vec::new()
            }
            PointerPhase::Leave => {
                self.session.pointer_leave();
                Vec::new()
            }
        };

        for center in &centers {
            compositor.stamp(&Stamp::new(*center, self.brush));
        }
        centers.len()
    }

    /// Apply any input event.
    ///
    /// # Errors
    ///
    /// Returns an error if a brush event carries an out-of-range radius.
    pub fn process_event(&mut self, event: &InputEvent, rect: &CanvasRect) -> MaskResult<usize> {
        match event {
            InputEvent::Pointer(pointer) => Ok(self.handle_pointer(pointer, rect)),
            InputEvent::Brush { radius } => {
                self.set_brush_radius(*radius)?;
                Ok(0)
            }
            InputEvent::Clear => {
                self.clear();
                Ok(0)
            }
        }
    }

    /// Discard all strokes. No-op without a source image.
    pub fn clear(&mut self) {
        if let Some(compositor) = self.compositor.as_mut() {
            compositor.clear();
        }
    }

    /// Record a successful upload.
    pub fn record_upload(&mut self, result: UploadResult) {
        self.last_upload = Some(result);
    }

    /// The most recent successful upload.
    #[must_use]
    pub fn last_upload(&self) -> Option<&UploadResult> {
        self.last_upload.as_ref()
    }
}
