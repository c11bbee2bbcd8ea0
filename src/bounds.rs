//! Bounding box, alignment and uniform scaling of flattened shapes

use crate::error::{ConvertError, Result};
use crate::types::{HorizontalAlign, Point, Shape, VerticalAlign};

/// Bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Degenerate box around a single point
    pub fn from_point(p: Point) -> Self {
        Self::new(p.x, p.y, p.x, p.y)
    }

    pub fn include(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}

/// Bounding box of every point of every shape
pub fn bounding_box(shapes: &[Shape]) -> Result<Bounds> {
    let mut points = shapes.iter().flat_map(|s| s.points.iter().copied());
    let first = points.next().ok_or(ConvertError::EmptyInput)?;

    let mut bounds = Bounds::from_point(first);
    for p in points {
        bounds.include(p);
    }
    Ok(bounds)
}

/// Offset subtracted from x for the given alignment
fn horizontal_offset(bounds: &Bounds, align: HorizontalAlign) -> f64 {
    match align {
        HorizontalAlign::Left => bounds.min_x,
        HorizontalAlign::Center => bounds.center().x,
        HorizontalAlign::Right => bounds.max_x,
    }
}

/// Offset subtracted from y; document y grows downward so the top is `min_y`
fn vertical_offset(bounds: &Bounds, align: VerticalAlign) -> f64 {
    match align {
        VerticalAlign::Top => bounds.min_y,
        VerticalAlign::Center => bounds.center().y,
        VerticalAlign::Bottom => bounds.max_y,
    }
}

/// Move all shapes so the chosen edge or center of their bounding box lands on the origin
pub fn align(
    shapes: &[Shape],
    horizontal: HorizontalAlign,
    vertical: VerticalAlign,
) -> Result<Vec<Shape>> {
    let bounds = bounding_box(shapes)?;
    let offset = Point::new(
        horizontal_offset(&bounds, horizontal),
        vertical_offset(&bounds, vertical),
    );

    Ok(shapes
        .iter()
        .map(|s| Shape::new(s.filled, s.points.iter().map(|p| *p - offset).collect()))
        .collect())
}

/// Multiply every coordinate by `factor`.
///
/// Scaling is about the origin, so align first to keep the drawing in place.
pub fn scale(shapes: &[Shape], factor: f64) -> Vec<Shape> {
    shapes
        .iter()
        .map(|s| {
            Shape::new(
                s.filled,
                s.points
                    .iter()
                    .map(|p| Point::new(p.x * factor, p.y * factor))
                    .collect(),
            )
        })
        .collect()
}

/// Uniform factor fitting `bounds` into the requested size.
///
/// A target of zero leaves that axis unconstrained; with both constrained
/// the smaller factor wins so the drawing fits in both. An axis whose
/// current extent is zero cannot be fitted and is treated as unconstrained.
pub fn resolve_scale_factor(bounds: &Bounds, target_width: f64, target_height: f64) -> f64 {
    let fx = (target_width != 0.0 && bounds.width() != 0.0).then(|| target_width / bounds.width());
    let fy =
        (target_height != 0.0 && bounds.height() != 0.0).then(|| target_height / bounds.height());

    match (fx, fy) {
        (Some(x), Some(y)) => x.min(y),
        (Some(x), None) => x,
        (None, Some(y)) => y,
        (None, None) => 1.0,
    }
}
