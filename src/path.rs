//! SVG path data to cubic segments, and cubic segments to points
//!
//! `svgtypes` tokenizes the `d` attribute; every command is turned into
//! absolute cubic segments here so that the rest of the pipeline only ever
//! deals with one curve type.

use crate::bezier::{elevate_quadratic, linearize, to_polyline};
use crate::error::{ConvertError, Result};
use crate::transform::Transform;
use crate::types::{CubicBezier, PathData, Point, Subpath};
use std::f64::consts::{FRAC_PI_2, PI};
use svgtypes::{PathParser, PathSegment};
use tracing::trace;

/// Builder state while walking path commands
struct PathBuilder {
    subpaths: Vec<Subpath>,
    current: Point,
    /// Second handle of the previous C/S, for reflecting into S
    last_cubic_ctrl: Option<Point>,
    /// Control point of the previous Q/T, for reflecting into T
    last_quad_ctrl: Option<Point>,
}

impl PathBuilder {
    fn new() -> Self {
        Self {
            subpaths: Vec::new(),
            current: Point::default(),
            last_cubic_ctrl: None,
            last_quad_ctrl: None,
        }
    }

    fn resolve(&self, abs: bool, x: f64, y: f64) -> Point {
        if abs {
            Point::new(x, y)
        } else {
            Point::new(self.current.x + x, self.current.y + y)
        }
    }

    fn move_to(&mut self, p: Point) {
        self.subpaths.push(Subpath::new(p));
        self.current = p;
    }

    /// Open subpath to draw into; drawing after `Z` starts a new one at the old start
    fn open_subpath(&mut self) -> &mut Subpath {
        let needs_new = self.subpaths.last().is_none_or(|sp| sp.closed);
        if needs_new {
            self.subpaths.push(Subpath::new(self.current));
        }
        let last = self.subpaths.len() - 1;
        &mut self.subpaths[last]
    }

    fn push(&mut self, segment: CubicBezier) {
        self.open_subpath().segments.push(segment);
        self.current = segment.p3;
    }

    fn line_to(&mut self, p: Point) {
        let from = self.current;
        self.push(CubicBezier::line(from, p));
    }

    fn close(&mut self) {
        let Some(start) = self.subpaths.last().map(|sp| sp.start) else {
            return;
        };
        if self.current != start {
            self.line_to(start);
        }
        if let Some(sp) = self.subpaths.last_mut() {
            sp.closed = true;
        }
        self.current = start;
    }

    fn finish(self) -> PathData {
        PathData {
            subpaths: self.subpaths,
        }
    }
}

/// Parse an SVG `d` attribute into absolute cubic segments grouped by subpath
pub fn parse_path_data(d: &str) -> Result<PathData> {
    let mut builder = PathBuilder::new();

    for segment in PathParser::from(d) {
        let segment =
            segment.map_err(|e| ConvertError::parse("path data", d, e.to_string()))?;

        let mut cubic_ctrl = None;
        let mut quad_ctrl = None;

        match segment {
            PathSegment::MoveTo { abs, x, y } => {
                let p = builder.resolve(abs, x, y);
                builder.move_to(p);
            }
            PathSegment::LineTo { abs, x, y } => {
                let p = builder.resolve(abs, x, y);
                builder.line_to(p);
            }
            PathSegment::HorizontalLineTo { abs, x } => {
                let cur = builder.current;
                let p = if abs {
                    Point::new(x, cur.y)
                } else {
                    Point::new(cur.x + x, cur.y)
                };
                builder.line_to(p);
            }
            PathSegment::VerticalLineTo { abs, y } => {
                let cur = builder.current;
                let p = if abs {
                    Point::new(cur.x, y)
                } else {
                    Point::new(cur.x, cur.y + y)
                };
                builder.line_to(p);
            }
            PathSegment::CurveTo {
                abs,
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                let cur = builder.current;
                let p1 = builder.resolve(abs, x1, y1);
                let p2 = builder.resolve(abs, x2, y2);
                let p3 = builder.resolve(abs, x, y);
                builder.push(CubicBezier::new(cur, p1, p2, p3));
                cubic_ctrl = Some(p2);
            }
            PathSegment::SmoothCurveTo { abs, x2, y2, x, y } => {
                let cur = builder.current;
                let p1 = match builder.last_cubic_ctrl {
                    Some(prev) => cur + (cur - prev),
                    None => cur,
                };
                let p2 = builder.resolve(abs, x2, y2);
                let p3 = builder.resolve(abs, x, y);
                builder.push(CubicBezier::new(cur, p1, p2, p3));
                cubic_ctrl = Some(p2);
            }
            PathSegment::Quadratic { abs, x1, y1, x, y } => {
                let cur = builder.current;
                let q1 = builder.resolve(abs, x1, y1);
                let q2 = builder.resolve(abs, x, y);
                builder.push(elevate_quadratic(cur, q1, q2));
                quad_ctrl = Some(q1);
            }
            PathSegment::SmoothQuadratic { abs, x, y } => {
                let cur = builder.current;
                let q1 = match builder.last_quad_ctrl {
                    Some(prev) => cur + (cur - prev),
                    None => cur,
                };
                let q2 = builder.resolve(abs, x, y);
                builder.push(elevate_quadratic(cur, q1, q2));
                quad_ctrl = Some(q1);
            }
            PathSegment::EllipticalArc {
                abs,
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                x,
                y,
            } => {
                let from = builder.current;
                let to = builder.resolve(abs, x, y);
                for piece in arc_to_cubics(from, rx, ry, x_axis_rotation, large_arc, sweep, to) {
                    builder.push(piece);
                }
            }
            PathSegment::ClosePath { .. } => builder.close(),
        }

        builder.last_cubic_ctrl = cubic_ctrl;
        builder.last_quad_ctrl = quad_ctrl;
    }

    let data = builder.finish();
    trace!(
        subpaths = data.subpaths.len(),
        segments = data.segment_count(),
        "parsed path data"
    );
    Ok(data)
}

/// Convert an endpoint-parameterized elliptical arc into cubic pieces of at most 90 degrees
#[allow(clippy::too_many_arguments)]
fn arc_to_cubics(
    from: Point,
    rx: f64,
    ry: f64,
    x_axis_rotation: f64,
    large_arc: bool,
    sweep: bool,
    to: Point,
) -> Vec<CubicBezier> {
    if from == to {
        return Vec::new();
    }

    let mut rx = rx.abs();
    let mut ry = ry.abs();
    if rx == 0.0 || ry == 0.0 {
        return vec![CubicBezier::line(from, to)];
    }

    let (sin_phi, cos_phi) = x_axis_rotation.to_radians().sin_cos();

    // Midpoint-relative start point in the ellipse's rotated frame
    let dx2 = (from.x - to.x) / 2.0;
    let dy2 = (from.y - to.y) / 2.0;
    let x1p = cos_phi * dx2 + sin_phi * dy2;
    let y1p = -sin_phi * dx2 + cos_phi * dy2;

    // Scale radii up if they cannot span the endpoints
    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let s = lambda.sqrt();
        rx *= s;
        ry *= s;
    }

    let rx2 = rx * rx;
    let ry2 = ry * ry;
    let num = rx2 * ry2 - rx2 * y1p * y1p - ry2 * x1p * x1p;
    let den = rx2 * y1p * y1p + ry2 * x1p * x1p;
    let mut coef = if den == 0.0 {
        0.0
    } else {
        (num / den).max(0.0).sqrt()
    };
    if large_arc == sweep {
        coef = -coef;
    }
    let cxp = coef * rx * y1p / ry;
    let cyp = -coef * ry * x1p / rx;

    let cx = cos_phi * cxp - sin_phi * cyp + (from.x + to.x) / 2.0;
    let cy = sin_phi * cxp + cos_phi * cyp + (from.y + to.y) / 2.0;

    let start_angle = vector_angle(1.0, 0.0, (x1p - cxp) / rx, (y1p - cyp) / ry);
    let mut sweep_angle = vector_angle(
        (x1p - cxp) / rx,
        (y1p - cyp) / ry,
        (-x1p - cxp) / rx,
        (-y1p - cyp) / ry,
    );
    if !sweep && sweep_angle > 0.0 {
        sweep_angle -= 2.0 * PI;
    } else if sweep && sweep_angle < 0.0 {
        sweep_angle += 2.0 * PI;
    }

    let count = (sweep_angle.abs() / FRAC_PI_2).ceil().max(1.0) as usize;
    let delta = sweep_angle / count as f64;
    let k = 4.0 / 3.0 * (delta / 4.0).tan();

    let map = |ux: f64, uy: f64| {
        Point::new(
            cx + rx * ux * cos_phi - ry * uy * sin_phi,
            cy + rx * ux * sin_phi + ry * uy * cos_phi,
        )
    };

    let mut pieces = Vec::with_capacity(count);
    for i in 0..count {
        let t1 = start_angle + delta * i as f64;
        let t2 = t1 + delta;
        let (s1, c1) = t1.sin_cos();
        let (s2, c2) = t2.sin_cos();

        let p0 = if i == 0 { from } else { map(c1, s1) };
        let p3 = if i == count - 1 { to } else { map(c2, s2) };
        pieces.push(CubicBezier::new(
            p0,
            map(c1 - k * s1, s1 + k * c1),
            map(c2 + k * s2, s2 - k * c2),
            p3,
        ));
    }

    // Keep consecutive pieces exactly joined
    for i in 1..pieces.len() {
        pieces[i].p0 = pieces[i - 1].p3;
    }
    pieces
}

fn vector_angle(ux: f64, uy: f64, vx: f64, vy: f64) -> f64 {
    (ux * vy - uy * vx).atan2(ux * vx + uy * vy)
}

/// Linearize every segment of `data` and map the resulting points through `transform`.
///
/// Each subpath contributes its start point followed by the end of every flat
/// piece; subpaths are concatenated in document order. Subpaths without
/// segments contribute nothing.
pub fn flatten(
    data: &PathData,
    transform: &Transform,
    tolerance: f64,
    max_depth: usize,
) -> Result<Vec<Point>> {
    let mut points = Vec::new();

    for subpath in &data.subpaths {
        if subpath.segments.is_empty() {
            continue;
        }

        let mut pieces = Vec::new();
        for segment in &subpath.segments {
            pieces.extend(linearize(segment, tolerance, max_depth)?);
        }
        points.extend(transform.apply_to_all(&to_polyline(&pieces)));
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bezier::DEFAULT_MAX_SUBDIVISION_DEPTH;

    const TOLERANCE: f64 = 0.1;

    fn flat(d: &str) -> Vec<Point> {
        let data = parse_path_data(d).unwrap();
        flatten(&data, &Transform::IDENTITY, TOLERANCE, DEFAULT_MAX_SUBDIVISION_DEPTH).unwrap()
    }

    #[test]
    fn test_straight_line() {
        assert_eq!(
            flat("M0,0 L10,0"),
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]
        );
    }

    #[test]
    fn test_relative_and_implicit_lineto() {
        assert_eq!(
            flat("m1 2 3 0 0 4"),
            vec![Point::new(1.0, 2.0), Point::new(4.0, 2.0), Point::new(4.0, 6.0)]
        );
    }

    #[test]
    fn test_horizontal_vertical() {
        assert_eq!(
            flat("M1 2 H3 V-1 h2 v3"),
            vec![
                Point::new(1.0, 2.0),
                Point::new(3.0, 2.0),
                Point::new(3.0, -1.0),
                Point::new(5.0, -1.0),
                Point::new(5.0, 2.0),
            ]
        );
    }

    #[test]
    fn test_close_path_returns_to_start() {
        let pts = flat("M0 0 L10 0 L10 10 Z");
        assert_eq!(pts.len(), 4);
        assert_eq!(pts[3], Point::new(0.0, 0.0));

        // already at the start: no extra closing segment
        let pts = flat("M0 0 L10 0 L0 0 z");
        assert_eq!(pts.len(), 3);
    }

    #[test]
    fn test_drawing_after_close_starts_at_subpath_start() {
        let data = parse_path_data("M5 5 L10 5 Z L5 10").unwrap();
        assert_eq!(data.subpaths.len(), 2);
        assert_eq!(data.subpaths[1].start, Point::new(5.0, 5.0));
        assert_eq!(data.subpaths[1].segments[0].p0, Point::new(5.0, 5.0));
        assert_eq!(data.subpaths[1].segments[0].p3, Point::new(5.0, 10.0));
    }

    #[test]
    fn test_every_subpath_starts_at_its_first_segment() {
        let data = parse_path_data("M0 0 L4 0 L4 4 z l2 2 z m1 1 h3 Z L0 9").unwrap();
        assert_eq!(data.subpaths.len(), 4);
        for sp in &data.subpaths {
            assert_eq!(sp.segments[0].p0, sp.start);
        }
        // close after drawing from a reopened subpath returns to the shared start
        assert_eq!(data.subpaths[1].segments.last().unwrap().p3, Point::new(0.0, 0.0));
        assert_eq!(data.subpaths[3].start, Point::new(1.0, 1.0));
    }

    #[test]
    fn test_multiple_subpaths_are_concatenated() {
        let pts = flat("M0 0 L1 0 M5 5 l0 1");
        assert_eq!(
            pts,
            vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(5.0, 5.0),
                Point::new(5.0, 6.0),
            ]
        );
    }

    #[test]
    fn test_curve_is_subdivided() {
        let pts = flat("M0 0 C0 20 10 -10 10 10");
        assert!(pts.len() > 2);
        assert_eq!(pts[0], Point::new(0.0, 0.0));
        assert_eq!(*pts.last().unwrap(), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_relative_curve() {
        let data = parse_path_data("M10 10 c0 5 5 5 5 0").unwrap();
        let seg = data.subpaths[0].segments[0];
        assert_eq!(seg.p1, Point::new(10.0, 15.0));
        assert_eq!(seg.p2, Point::new(15.0, 15.0));
        assert_eq!(seg.p3, Point::new(15.0, 10.0));
    }

    #[test]
    fn test_smooth_curve_reflects_previous_handle() {
        let data = parse_path_data("M0 0 C0 10 10 10 10 0 S20 -10 20 0").unwrap();
        let second = data.subpaths[0].segments[1];
        assert_eq!(second.p0, Point::new(10.0, 0.0));
        assert_eq!(second.p1, Point::new(10.0, -10.0));
        assert_eq!(second.p2, Point::new(20.0, -10.0));

        // without a previous cubic the first handle is the current point
        let data = parse_path_data("M0 0 S5 5 10 0").unwrap();
        assert_eq!(data.subpaths[0].segments[0].p1, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_quadratic_is_elevated() {
        let data = parse_path_data("M0 0 Q3 6 9 0").unwrap();
        let seg = data.subpaths[0].segments[0];
        assert_eq!(seg.p0, Point::new(0.0, 0.0));
        assert_eq!(seg.p3, Point::new(9.0, 0.0));
        assert!(seg.p1.distance(Point::new(2.0, 4.0)) < 1e-9);
        assert!(seg.p2.distance(Point::new(5.0, 4.0)) < 1e-9);
    }

    #[test]
    fn test_smooth_quadratic_reflects_control() {
        let data = parse_path_data("M0 0 Q5 5 10 0 T20 0").unwrap();
        let second = data.subpaths[0].segments[1];
        // reflected control is (15, -5); elevated p1 = 10 + 2/3 * (5, -5)
        assert!(second.p1.distance(Point::new(10.0 + 10.0 / 3.0, -10.0 / 3.0)) < 1e-9);
    }

    #[test]
    fn test_arc_stays_on_circle() {
        let pts = flat("M0 0 A1 1 0 0 1 2 0");
        assert!(pts.len() > 2);
        assert_eq!(pts[0], Point::new(0.0, 0.0));
        assert_eq!(*pts.last().unwrap(), Point::new(2.0, 0.0));
        for p in &pts {
            assert!((p.distance(Point::new(1.0, 0.0)) - 1.0).abs() < 1e-3);
        }
        let max_abs_y = pts.iter().map(|p| p.y.abs()).fold(0.0, f64::max);
        assert!(max_abs_y > 0.9);
    }

    #[test]
    fn test_degenerate_arcs() {
        assert_eq!(
            flat("M0 0 A0 5 0 0 1 4 0"),
            vec![Point::new(0.0, 0.0), Point::new(4.0, 0.0)]
        );
        assert!(flat("M3 3 A2 2 0 0 1 3 3").is_empty());
    }

    #[test]
    fn test_transform_applied_after_linearization() {
        let data = parse_path_data("M0 0 L10 0").unwrap();
        let pts = flatten(
            &data,
            &Transform::translate(5.0, 5.0),
            TOLERANCE,
            DEFAULT_MAX_SUBDIVISION_DEPTH,
        )
        .unwrap();
        assert_eq!(pts, vec![Point::new(5.0, 5.0), Point::new(15.0, 5.0)]);
    }

    #[test]
    fn test_empty_and_move_only_paths_are_empty() {
        assert!(parse_path_data("").unwrap().is_empty());
        assert!(parse_path_data("M10 10").unwrap().is_empty());
        assert!(flat("M10 10 M20 20").is_empty());
    }

    #[test]
    fn test_malformed_path_data() {
        assert!(matches!(
            parse_path_data("M0 0 L10"),
            Err(ConvertError::Parse { kind: "path data", .. })
        ));
        assert!(parse_path_data("X 1 2").is_err());
    }
}
