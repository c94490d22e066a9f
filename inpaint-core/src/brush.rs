//! Brush geometry: pointer-to-canvas mapping and disc stamps.

use serde::{Deserialize, Serialize};

use crate::{MaskError, MaskResult};

/// Smallest brush radius the size control offers.
pub const MIN_BRUSH_RADIUS: u32 = 5;
/// Largest brush radius the size control offers.
pub const MAX_BRUSH_RADIUS: u32 = 50;
/// Brush radius used until the user changes it.
pub const DEFAULT_BRUSH_RADIUS: u32 = 10;

/// A position in surface-local pixel coordinates.
///
/// Fractional values are allowed; the pixel grid is only consulted when a
/// stamp is rasterized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Whether both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// The canvas' on-screen bounding rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasRect {
    /// Left edge in client coordinates.
    pub left: f32,
    /// Top edge in client coordinates.
    pub top: f32,
    /// Width in client pixels.
    pub width: f32,
    /// Height in client pixels.
    pub height: f32,
}

impl CanvasRect {
    /// Create a rectangle anchored at the client origin.
    #[must_use]
    pub const fn at_origin(width: f32, height: f32) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }

    /// Map a client-space pointer position to canvas-local coordinates.
    ///
    /// The result is not clamped: positions outside the rectangle produce
    /// coordinates outside the surface, and the rasterizer clips them.
    #[must_use]
    pub fn to_local(&self, client_x: f32, client_y: f32) -> Point {
        Point::new(client_x - self.left, client_y - self.top)
    }
}

/// Brush radius in pixels, bounded to `[MIN_BRUSH_RADIUS, MAX_BRUSH_RADIUS]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct BrushRadius(u32);

impl BrushRadius {
    /// Create a radius, rejecting values outside the supported range.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::InvalidBrushRadius`] if `radius` is out of range.
    pub fn new(radius: u32) -> MaskResult<Self> {
        if (MIN_BRUSH_RADIUS..=MAX_BRUSH_RADIUS).contains(&radius) {
            Ok(Self(radius))
        } else {
            Err(MaskError::InvalidBrushRadius(radius))
        }
    }

    /// Create a radius, snapping out-of-range values to the nearest bound.
    #[must_use]
    pub fn clamped(radius: u32) -> Self {
        Self(radius.clamp(MIN_BRUSH_RADIUS, MAX_BRUSH_RADIUS))
    }

    /// Radius in whole pixels.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for BrushRadius {
    fn default() -> Self {
        Self(DEFAULT_BRUSH_RADIUS)
    }
}

impl TryFrom<u32> for BrushRadius {
    type Error = MaskError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BrushRadius> for u32 {
    fn from(radius: BrushRadius) -> Self {
        radius.0
    }
}

/// Clipped pixel region touched by a stamp (half-open on the max side).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBounds {
    /// First covered column.
    pub x_min: u32,
    /// First covered row.
    pub y_min: u32,
    /// One past the last covered column.
    pub x_max: u32,
    /// One past the last covered row.
    pub y_max: u32,
}

/// A single filled disc applied to both surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stamp {
    /// Disc center in surface coordinates.
    pub center: Point,
    /// Disc radius in pixels.
    pub radius: u32,
}

impl Stamp {
    /// Create a stamp at `center` with the given brush radius.
    #[must_use]
    pub fn new(center: Point, radius: BrushRadius) -> Self {
        Self {
            center,
            radius: radius.get(),
        }
    }

    /// Whether the pixel at `(px, py)` is inside the disc.
    ///
    /// A pixel is covered when its center lies within `radius` of the
    /// stamp center. Edges are hard; there is no partial coverage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn covers(&self, px: u32, py: u32) -> bool {
        let dx = px as f32 + 0.5 - self.center.x;
        let dy = py as f32 + 0.5 - self.center.y;
        let r = self.radius as f32;
        dx.mul_add(dx, dy * dy) <= r * r
    }

    /// Pixel bounding box of the disc clipped to a `width` x `height` grid.
    ///
    /// Returns `None` when the disc lies entirely outside the grid.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn pixel_bounds(&self, width: u32, height: u32) -> Option<PixelBounds> {
        let r = self.radius as f32;

        let x_min = (self.center.x - r).floor().max(0.0);
        let y_min = (self.center.y - r).floor().max(0.0);
        let x_max = (self.center.x + r).ceil().max(0.0);
        let y_max = (self.center.y + r).ceil().max(0.0);

        let x_min = (x_min as u32).min(width);
        let y_min = (y_min as u32).min(height);
        let x_max = (x_max as u32).min(width);
        let y_max = (y_max as u32).min(height);

        if x_min >= x_max || y_min >= y_max {
            return None;
        }

        Some(PixelBounds {
            x_min,
            y_min,
            x_max,
            y_max,
        })
    }
}

/// Intermediate stamp centers between two pointer samples.
///
/// Centers are spaced at most `radius / 2` apart so consecutive discs
/// overlap. `from` is excluded (it was already stamped) and `to` is always
/// the last element.
///
/// Only the part of the segment within `radius` of the `width` x `height`
/// surface is filled; stamps beyond that could not touch a pixel. A
/// non-finite endpoint or span yields just `to`.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn interpolate(
    from: Point,
    to: Point,
    radius: BrushRadius,
    width: u32,
    height: u32,
) -> Vec<Point> {
    let delta = Point::new(to.x - from.x, to.y - from.y);
    if !from.is_finite() || !to.is_finite() || !delta.is_finite() {
        return vec![to];
    }

    let r = radius.get() as f32;
    let min = Point::new(-r, -r);
    let max = Point::new(width as f32 + r, height as f32 + r);
    let Some((t0, t1)) = clip_segment(from, to, min, max) else {
        return vec![to];
    };

    let along = |t: f32| {
        Point::new(
            (to.x - from.x).mul_add(t, from.x),
            (to.y - from.y).mul_add(t, from.y),
        )
    };
    let start = if t0 > 0.0 { along(t0) } else { from };
    let end = if t1 < 1.0 { along(t1) } else { to };

    let spacing = (r / 2.0).max(1.0);
    let steps = (start.distance_to(end) / spacing).ceil().max(1.0) as u32;

    let mut centers = Vec::with_capacity(steps as usize + 2);
    if t0 > 0.0 {
        centers.push(start);
    }
    centers.extend((1..steps).map(|i| {
        let t = i as f32 / steps as f32;
        Point::new(
            (end.x - start.x).mul_add(t, start.x),
            (end.y - start.y).mul_add(t, start.y),
        )
    }));
    centers.push(end);
    if t1 < 1.0 {
        centers.push(to);
    }
    centers
}

/// Liang-Barsky clip of the segment `from → to` against the box
/// `[min, max]`. Returns the parameter range inside the box.
fn clip_segment(from: Point, to: Point, min: Point, max: Point) -> Option<(f32, f32)> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let mut t0 = 0.0_f32;
    let mut t1 = 1.0_f32;

    for (p, q) in [
        (-dx, from.x - min.x),
        (dx, max.x - from.x),
        (-dy, from.y - min.y),
        (dy, max.y - from.y),
    ] {
        if p.abs() < f32::EPSILON {
            // Parallel to this edge: inside or out for the whole segment.
            if q < 0.0 {
                return None;
            }
            continue;
        }

        let t = q / p;
        if p < 0.0 {
            if t > t1 {
                return None;
            }
            t0 = t0.max(t);
        } else {
            if t < t0 {
                return None;
            }
            t1 = t1.min(t);
        }
    }

    Some((t0, t1))
}
