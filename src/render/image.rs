//! Image rendering for annotations using tiny-skia
//!
//! The compositor is a pure function of the base image, the committed shapes,
//! the in-progress shape and the selection. Every frame starts from a full copy
//! of the base image, so stale strokes can never survive a redraw.

use image::RgbaImage;
use tiny_skia::{
    ColorU8, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, StrokeDash, Transform,
};

use super::geometry::{highlight, stroke};
use crate::config::ShapeColor;
use crate::domain::{Shape, ShapeId, ShapeKind};

/// Everything needed to paint one frame
#[derive(Clone, Copy, Debug)]
pub struct Scene<'a> {
    /// Immutable scaled source image
    pub base: &'a Pixmap,
    /// Committed shapes in z-order
    pub shapes: &'a [Shape],
    /// Shape currently being drawn
    pub current: Option<&'a Shape>,
    /// Selected shape, if any
    pub selected: Option<ShapeId>,
    /// Highlight color for the selection, `None` to skip the overlay
    pub highlight: Option<ShapeColor>,
}

/// Convert an RGBA image to a premultiplied pixmap
pub fn pixmap_from_rgba(img: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(img.width(), img.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(img.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

/// Convert a premultiplied pixmap back to straight-alpha RGBA
pub fn rgba_from_pixmap(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}

/// Build the stroke path for a shape
///
/// Returns `None` for geometry that has nothing to stroke yet, such as a
/// freehand stroke with a single point or a zero-radius circle.
pub fn build_shape_path(shape: &Shape) -> Option<tiny_skia::Path> {
    match shape.kind() {
        ShapeKind::Freehand => {
            let (first, rest) = shape.points.split_first()?;
            if rest.is_empty() {
                return None;
            }
            let mut pb = PathBuilder::new();
            pb.move_to(first.x, first.y);
            for p in rest {
                pb.line_to(p.x, p.y);
            }
            pb.finish()
        }
        ShapeKind::Circle => {
            let center = shape.anchor()?;
            let radius = shape.radius()?;
            if radius <= 0.0 {
                return None;
            }
            PathBuilder::from_circle(center.x, center.y, radius)
        }
        ShapeKind::Rectangle => {
            let (min_x, min_y, max_x, max_y) = shape.rect_bounds()?;
            let mut pb = PathBuilder::new();
            pb.move_to(min_x, min_y);
            pb.line_to(max_x, min_y);
            pb.line_to(max_x, max_y);
            pb.line_to(min_x, max_y);
            pb.close();
            pb.finish()
        }
    }
}

/// Stroke a shape with the given color and width, optionally dashed
fn stroke_shape(
    pixmap: &mut Pixmap,
    shape: &Shape,
    color: ShapeColor,
    width: f32,
    dash: Option<StrokeDash>,
) {
    if width < stroke::MIN_WIDTH {
        return;
    }
    let Some(path) = build_shape_path(shape) else {
        return;
    };

    let [r, g, b, a] = color.to_rgba_u8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;

    let stroke = Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        dash,
        ..Default::default()
    };
    pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
}

/// Draw a shape using its own color and stroke width
pub fn draw_shape(pixmap: &mut Pixmap, shape: &Shape) {
    stroke_shape(pixmap, shape, shape.color, shape.stroke_width, None);
}

/// Draw the dashed selection outline over a shape
pub fn draw_selection(pixmap: &mut Pixmap, shape: &Shape, color: ShapeColor) {
    let dash = StrokeDash::new(highlight::DASH.to_vec(), 0.0);
    let width = shape.stroke_width.max(highlight::MIN_WIDTH);
    stroke_shape(pixmap, shape, color, width, dash);
}

/// Repaint `surface` from scratch for the given scene
///
/// The base image fully overwrites the surface, then committed shapes are drawn
/// in insertion order, then the in-progress shape, then the selection overlay.
pub fn redraw(surface: &mut Pixmap, scene: &Scene<'_>) {
    if surface.width() == scene.base.width() && surface.height() == scene.base.height() {
        surface.data_mut().copy_from_slice(scene.base.data());
    } else {
        *surface = scene.base.clone();
    }

    for shape in scene.shapes {
        draw_shape(surface, shape);
    }

    if let Some(current) = scene.current {
        draw_shape(surface, current);
    }

    if let (Some(id), Some(color)) = (scene.selected, scene.highlight)
        && let Some(shape) = scene.shapes.iter().find(|s| s.id == id)
    {
        draw_selection(surface, shape, color);
    }
}

/// Render a scene into a fresh pixmap
pub fn compose(scene: &Scene<'_>) -> Pixmap {
    let mut surface = scene.base.clone();
    redraw(&mut surface, scene);
    surface
}
