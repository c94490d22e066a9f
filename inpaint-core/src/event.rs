//! Input events for mask painting.

use serde::{Deserialize, Serialize};

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button pressed over the canvas.
    Down,
    /// Pointer moved (button state unknown).
    Move,
    /// Button released.
    Up,
    /// Pointer left the canvas.
    Leave,
}

/// A pointer (mouse) event in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Phase of this event.
    pub phase: PointerPhase,
    /// X position in client coordinates.
    pub client_x: f32,
    /// Y position in client coordinates.
    pub client_y: f32,
    /// Timestamp in milliseconds since the session started.
    #[serde(default)]
    pub timestamp_ms: u64,
}

impl PointerEvent {
    /// Create a new pointer event.
    #[must_use]
    pub fn new(phase: PointerPhase, client_x: f32, client_y: f32) -> Self {
        Self {
            phase,
            client_x,
            client_y,
            timestamp_ms: 0,
        }
    }

    /// Button pressed at a client position.
    #[must_use]
    pub fn down(client_x: f32, client_y: f32) -> Self {
        Self::new(PointerPhase::Down, client_x, client_y)
    }

    /// Pointer moved to a client position.
    #[must_use]
    pub fn moved(client_x: f32, client_y: f32) -> Self {
        Self::new(PointerPhase::Move, client_x, client_y)
    }

    /// Button released at a client position.
    #[must_use]
    pub fn up(client_x: f32, client_y: f32) -> Self {
        Self::new(PointerPhase::Up, client_x, client_y)
    }

    /// Pointer left the canvas at a client position.
    #[must_use]
    pub fn leave(client_x: f32, client_y: f32) -> Self {
        Self::new(PointerPhase::Leave, client_x, client_y)
    }
}

/// All input the painting session can receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum InputEvent {
    /// Pointer event over the canvas.
    Pointer(PointerEvent),

    /// Brush size control changed.
    Brush {
        /// New radius in pixels.
        radius: u32,
    },

    /// Clear action.
    Clear,
}

/// Parse a JSON stroke script (an array of [`InputEvent`]s).
///
/// # Errors
///
/// Returns an error if the script is not valid JSON or contains unknown
/// event types.
pub fn parse_script(json: &str) -> crate::MaskResult<Vec<InputEvent>> {
    Ok(serde_json::from_str(json)?)
}
