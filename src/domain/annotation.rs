//! Annotation shape types and hit-testing
//!
//! All shape coordinates are stored in canvas space.

use serde::{Deserialize, Serialize};

use super::geometry::{Point, distance_to_segment, normalize_rect};
use crate::config::ShapeColor;

/// Opaque shape identifier, stable for the shape's lifetime
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(pub(crate) u64);

/// Kind of annotation primitive. Never changes after creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Freehand,
    Circle,
    Rectangle,
}

/// A single annotation primitive
///
/// `freehand` shapes are open polylines. `circle` and `rectangle` shapes carry
/// exactly two points once complete: the anchor from pointer-down and the
/// defining point from the latest pointer position.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub id: ShapeId,
    kind: ShapeKind,
    pub points: Vec<Point>,
    pub color: ShapeColor,
    pub stroke_width: f32,
}

impl Shape {
    /// Start a new shape with a single anchor point
    pub fn new(
        id: ShapeId,
        kind: ShapeKind,
        anchor: Point,
        color: ShapeColor,
        stroke_width: f32,
    ) -> Self {
        Self {
            id,
            kind,
            points: vec![anchor],
            color,
            stroke_width,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Whether the shape may be committed and hit-tested
    pub fn is_complete(&self) -> bool {
        match self.kind {
            ShapeKind::Freehand => self.points.len() >= 2,
            ShapeKind::Circle | ShapeKind::Rectangle => self.points.len() == 2,
        }
    }

    /// Anchor point (first pointer-down position)
    pub fn anchor(&self) -> Option<Point> {
        self.points.first().copied()
    }

    /// Feed the latest pointer position into an in-progress shape
    ///
    /// Freehand strokes append. Circles and rectangles keep only the anchor and
    /// the newest point.
    pub fn extend(&mut self, p: Point) {
        match self.kind {
            ShapeKind::Freehand => self.points.push(p),
            ShapeKind::Circle | ShapeKind::Rectangle => {
                self.points.truncate(1);
                self.points.push(p);
            }
        }
    }

    /// Circle radius: distance from the anchor to the defining point
    pub fn radius(&self) -> Option<f32> {
        match (self.kind, self.points.as_slice()) {
            (ShapeKind::Circle, [anchor, edge]) => Some(anchor.distance_to(*edge)),
            _ => None,
        }
    }

    /// Rectangle extents as `(min_x, min_y, max_x, max_y)`
    pub fn rect_bounds(&self) -> Option<(f32, f32, f32, f32)> {
        match (self.kind, self.points.as_slice()) {
            (ShapeKind::Rectangle, [a, b]) => Some(normalize_rect(*a, *b)),
            _ => None,
        }
    }

    /// Move every point of the shape by `delta`
    pub fn translate(&mut self, delta: Point) {
        for p in &mut self.points {
            *p = p.offset(delta);
        }
    }

    /// Hit-test a canvas point against the stroked geometry
    ///
    /// Incomplete shapes never match.
    pub fn contains_point(&self, p: Point) -> bool {
        if !self.is_complete() {
            return false;
        }
        let half = self.stroke_width / 2.0;

        match self.kind {
            ShapeKind::Circle => match (self.anchor(), self.radius()) {
                (Some(center), Some(radius)) => p.distance_to(center) <= radius + half,
                _ => false,
            },
            ShapeKind::Rectangle => match self.rect_bounds() {
                Some((min_x, min_y, max_x, max_y)) => {
                    p.x >= min_x - half
                        && p.x <= max_x + half
                        && p.y >= min_y - half
                        && p.y <= max_y + half
                }
                None => false,
            },
            ShapeKind::Freehand => self
                .points
                .windows(2)
                .any(|seg| distance_to_segment(p, seg[0], seg[1]) <= half),
        }
    }
}
