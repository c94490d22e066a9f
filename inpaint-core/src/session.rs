//! Stroke session state machine.
//!
//! ```text
//!          pointer_down / stamp
//!   Idle ───────────────────────► Drawing ──┐
//!    ▲                               │      │ pointer_move / stamp
//!    └──── pointer_up | leave ───────┘ ◄────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::brush::{interpolate, BrushRadius, Point};

/// Stroke lifecycle phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokePhase {
    /// No button held; pointer motion does not paint.
    #[default]
    Idle,
    /// Button held; every move sample paints.
    Drawing,
}

/// Tracks pointer-down/drag/up and decides where stamps go.
///
/// The session never touches pixels itself. Each transition returns the
/// stamp centers the caller should apply, in order.
#[derive(Debug, Clone, Default)]
pub struct StrokeSession {
    phase: StrokePhase,
    last_point: Option<Point>,
    interpolate: bool,
}

impl StrokeSession {
    /// Create an idle session.
    ///
    /// With `interpolate` set, moves fill the gap from the previous sample
    /// with overlapping stamps instead of stamping only at the sample.
    #[must_use]
    pub fn new(interpolate: bool) -> Self {
        Self {
            interpolate,
            ..Self::default()
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> StrokePhase {
        self.phase
    }

    /// Whether a stroke is in progress.
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.phase == StrokePhase::Drawing
    }

    /// Whether move samples are interpolated.
    #[must_use]
    pub fn interpolates(&self) -> bool {
        self.interpolate
    }

    /// Button pressed: start a stroke and stamp once at `point`.
    pub fn pointer_down(&mut self, point: Point) -> Vec<Point> {
        tracing::debug!("Stroke started at ({:.1}, {:.1})", point.x, point.y);
        self.phase = StrokePhase::Drawing;
        self.last_point = Some(point);
        vec![point]
    }

    /// Pointer moved: stamp at `point` if a stroke is in progress.
    ///
    /// `surface` is the `(width, height)` being painted; interpolation
    /// stops at its edge.
    pub fn pointer_move(
        &mut self,
        point: Point,
        radius: BrushRadius,
        surface: (u32, u32),
    ) -> Vec<Point> {
        if !self.is_drawing() {
            return Vec::new();
        }

        let centers = match self.last_point {
            Some(from) if self.interpolate => {
                interpolate(from, point, radius, surface.0, surface.1)
            }
            _ => vec![point],
        };
        self.last_point = Some(point);
        centers
    }

    /// Button released: end the stroke without stamping.
    pub fn pointer_up(&mut self) {
        if self.is_drawing() {
            tracing::debug!("Stroke ended");
        }
        self.end_stroke();
    }

    /// Pointer left the canvas: end the stroke without stamping.
    pub fn pointer_leave(&mut self) {
        if self.is_drawing() {
            tracing::debug!("Stroke ended (pointer left canvas)");
        }
        self.end_stroke();
    }

    /// Force the session back to idle.
    pub fn reset(&mut self) {
        self.end_stroke();
    }

    fn end_stroke(&mut self) {
        self.phase = StrokePhase::Idle;
        self.last_point = None;
    }
}
