//! # Inpaint Core
//!
//! Core painting logic for inpaint masks: a circular brush paints onto a
//! translucent preview and a strict black/white mask at the same time.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 MaskingState                │
//! ├─────────────────────────────────────────────┤
//! │  Stroke Session   │  Brush Geometry         │
//! │  - Idle/Drawing   │  - Client → local       │
//! │  - Interpolation  │  - Disc coverage        │
//! ├─────────────────────────────────────────────┤
//! │  Compositor                                 │
//! │  - Preview (RGBA, accumulating overlay)     │
//! │  - Mask    (opaque black/white, idempotent) │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod brush;
pub mod compositor;
pub mod error;
pub mod event;
pub mod session;
pub mod source;
pub mod state;
pub mod surface;
pub mod upload;

pub use brush::{BrushRadius, CanvasRect, Point, Stamp};
pub use compositor::Compositor;
pub use error::{MaskError, MaskResult};
pub use event::{InputEvent, PointerEvent, PointerPhase};
pub use session::{StrokePhase, StrokeSession};
pub use source::{ImageFormat, SourceImage};
pub use state::{MaskingState, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
pub use surface::{Rgba, Surface};
pub use upload::UploadResult;

/// Inpaint core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
