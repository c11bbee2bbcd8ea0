//! Cubic Bezier linearization by de Casteljau subdivision
//!
//! Curves are split in half until every piece passes a cheap flatness test
//! based on the distance of the handles from their ideal positions on the
//! chord (Roger Willcocks' bound). The tolerance is compared against that
//! squared, scaled metric, so it corresponds to roughly `16 * d^2` for a
//! maximum deviation `d`.

use crate::error::{ConvertError, Result};
use crate::types::{CubicBezier, Point};

/// Maximum number of halvings applied to a single curve
pub const DEFAULT_MAX_SUBDIVISION_DEPTH: usize = 20;

/// Split `curve` at parameter `t` into two curves covering the same path
pub fn subdivide(curve: &CubicBezier, t: f64) -> (CubicBezier, CubicBezier) {
    let p01 = curve.p0.lerp(curve.p1, t);
    let p12 = curve.p1.lerp(curve.p2, t);
    let p23 = curve.p2.lerp(curve.p3, t);
    let p012 = p01.lerp(p12, t);
    let p123 = p12.lerp(p23, t);
    let mid = p012.lerp(p123, t);

    (
        CubicBezier::new(curve.p0, p01, p012, mid),
        CubicBezier::new(mid, p123, p23, curve.p3),
    )
}

/// Split at t = 0.5
pub fn split_half(curve: &CubicBezier) -> (CubicBezier, CubicBezier) {
    subdivide(curve, 0.5)
}

/// True if the handles sit close enough to the chord for the curve to be drawn as a line
pub fn is_flat_enough(curve: &CubicBezier, tolerance: f64) -> bool {
    let ux = (3.0 * curve.p1.x - 2.0 * curve.p0.x - curve.p3.x).powi(2);
    let uy = (3.0 * curve.p1.y - 2.0 * curve.p0.y - curve.p3.y).powi(2);
    let vx = (3.0 * curve.p2.x - 2.0 * curve.p3.x - curve.p0.x).powi(2);
    let vy = (3.0 * curve.p2.y - 2.0 * curve.p3.y - curve.p0.y).powi(2);

    ux.max(vx) + uy.max(vy) <= tolerance
}

/// Relative distance from the chord under which a handle counts as on it
const STRAIGHT_EPSILON: f64 = 1e-9;

/// True if both handles lie on the segment `p0..p3`, so the curve traces that
/// segment and nothing else.
pub fn is_straight(curve: &CubicBezier) -> bool {
    let chord = curve.p3 - curve.p0;
    let len_sq = chord.x * chord.x + chord.y * chord.y;

    if len_sq == 0.0 {
        return curve.p1 == curve.p0 && curve.p2 == curve.p0;
    }

    [curve.p1, curve.p2].iter().all(|&handle| {
        let v = handle - curve.p0;
        let cross = chord.x * v.y - chord.y * v.x;
        let t = (chord.x * v.x + chord.y * v.y) / len_sq;
        cross.abs() <= STRAIGHT_EPSILON * len_sq
            && (-STRAIGHT_EPSILON..=1.0 + STRAIGHT_EPSILON).contains(&t)
    })
}

/// Subdivide `curve` until every returned piece is flat enough.
///
/// Pieces are returned in curve order. A straight piece is returned whole
/// whatever the tolerance. A piece that is still not flat after `max_depth`
/// halvings (only possible for non-finite input or a tolerance of zero on a
/// real curve) fails with `RecursionLimitExceeded`.
pub fn linearize(
    curve: &CubicBezier,
    tolerance: f64,
    max_depth: usize,
) -> Result<Vec<CubicBezier>> {
    let mut pieces = Vec::new();
    linearize_into(curve, tolerance, 0, max_depth, &mut pieces).map_err(|limit| {
        ConvertError::RecursionLimitExceeded {
            what: format!("{} at tolerance {}", curve, tolerance),
            limit,
        }
    })?;
    Ok(pieces)
}

fn linearize_into(
    piece: &CubicBezier,
    tolerance: f64,
    depth: usize,
    max_depth: usize,
    out: &mut Vec<CubicBezier>,
) -> std::result::Result<(), usize> {
    if is_straight(piece) || is_flat_enough(piece, tolerance) {
        out.push(*piece);
        return Ok(());
    }

    if depth >= max_depth {
        return Err(max_depth);
    }

    let (left, right) = split_half(piece);
    linearize_into(&left, tolerance, depth + 1, max_depth, out)?;
    linearize_into(&right, tolerance, depth + 1, max_depth, out)
}

/// Collapse flat pieces into the points they connect: start of the first, then each end
pub fn to_polyline(segments: &[CubicBezier]) -> Vec<Point> {
    let Some(first) = segments.first() else {
        return Vec::new();
    };

    let mut points = Vec::with_capacity(segments.len() + 1);
    points.push(first.p0);
    points.extend(segments.iter().map(|s| s.p3));
    points
}

/// Exact degree elevation of the quadratic `q0 q1 q2`
pub fn elevate_quadratic(q0: Point, q1: Point, q2: Point) -> CubicBezier {
    CubicBezier::new(q0, q0.lerp(q1, 2.0 / 3.0), q1.lerp(q2, 1.0 / 3.0), q2)
}
