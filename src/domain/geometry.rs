//! Geometric types for canvas space and on-screen coordinates
//!
//! Canvas space is the pixel grid of the scaled drawing surface. It is distinct
//! from source-image pixels and from the on-screen (CSS) pixels the host reports
//! pointer positions in.

use serde::{Deserialize, Serialize};

/// A 2-D coordinate in canvas pixel space
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Vector from `origin` to this point
    pub fn delta_from(self, origin: Point) -> Point {
        Point::new(self.x - origin.x, self.y - origin.y)
    }

    /// Translate the point by the given offset
    pub fn offset(self, delta: Point) -> Point {
        Point::new(self.x + delta.x, self.y + delta.y)
    }
}

/// Distance from `p` to the closest point of segment `a..b`
///
/// The projection parameter is clamped to `[0, 1]`, so points beyond either
/// end measure against the nearest endpoint.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return p.distance_to(a);
    }

    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance_to(Point::new(a.x + t * dx, a.y + t * dy))
}

/// Normalize min/max coordinates from two arbitrary corners
#[inline]
pub fn normalize_rect(a: Point, b: Point) -> (f32, f32, f32, f32) {
    let (min_x, max_x) = if a.x < b.x { (a.x, b.x) } else { (b.x, a.x) };
    let (min_y, max_y) = if a.y < b.y { (a.y, b.y) } else { (b.y, a.y) };
    (min_x, min_y, max_x, max_y)
}

/// On-screen bounding rectangle of the drawing surface, in client pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Whether the bounds describe a measurable, non-empty area
    pub fn is_measurable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Backing-store size of the drawing surface
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Layout area available to the scaled image once the surface is attached
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Viewport of a container after subtracting `padding` on every side
    pub fn from_container(width: f32, height: f32, padding: f32) -> Self {
        Self {
            width: (width - padding * 2.0).max(0.0),
            height: (height - padding * 2.0).max(0.0),
        }
    }

    /// Whether layout produced a usable size
    pub fn is_measurable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Convert a client-space pointer position into canvas space
///
/// The x and y ratios are computed independently from the backing-store size
/// over the on-screen size, so CSS scaling of the surface does not affect
/// drawing precision. Returns `None` when the surface has no measurable size.
pub fn map_client_point(client: Point, bounds: Bounds, backing: SurfaceSize) -> Option<Point> {
    if !bounds.is_measurable() {
        return None;
    }
    let sx = backing.width as f32 / bounds.width;
    let sy = backing.height as f32 / bounds.height;
    Some(Point::new(
        (client.x - bounds.left) * sx,
        (client.y - bounds.top) * sy,
    ))
}

/// Uniform scale that fits an image of `(width, height)` inside the viewport
pub fn fit_scale(width: u32, height: u32, viewport: Viewport) -> Option<f32> {
    if width == 0 || height == 0 || !viewport.is_measurable() {
        return None;
    }
    Some((viewport.width / width as f32).min(viewport.height / height as f32))
}

/// Surface size for an image drawn at `scale`, truncated to whole pixels
///
/// The product is taken in f64 with a small tolerance so a fit scale whose f32
/// rounding lands just under an integer still fills the viewport.
pub fn scaled_size(width: u32, height: u32, scale: f32) -> SurfaceSize {
    let truncate = |side: u32| ((side as f64 * scale as f64 + 1e-3).floor() as u32).max(1);
    SurfaceSize {
        width: truncate(width),
        height: truncate(height),
    }
}
