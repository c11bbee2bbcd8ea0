//! 2D affine transforms and the SVG `transform` attribute mini-language

use crate::error::{ConvertError, Result};
use crate::types::Point;
use svgtypes::NumberListParser;

/// 2D affine transformation matrix [a, b, c, d, e, f]
/// Represents: | a  c  e |
///             | b  d  f |
///             | 0  0  1 |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Same argument order as SVG `matrix(a,b,c,d,e,f)`
    pub const fn matrix(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub const fn translate(tx: f64, ty: f64) -> Self {
        Self::matrix(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::matrix(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation about the origin, positive angles turn +x towards +y
    pub fn rotate_degrees(angle: f64) -> Self {
        let (sin, cos) = angle.to_radians().sin_cos();
        Self::matrix(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Rotation about `(cx, cy)`
    pub fn rotate_degrees_about(angle: f64, cx: f64, cy: f64) -> Self {
        let mut rotation = Self::rotate_degrees(angle);
        rotation.e = cx;
        rotation.f = cy;
        rotation.compose(&Self::translate(-cx, -cy))
    }

    pub fn skew_x_degrees(angle: f64) -> Self {
        Self::matrix(1.0, 0.0, angle.to_radians().tan(), 1.0, 0.0, 0.0)
    }

    pub fn skew_y_degrees(angle: f64) -> Self {
        Self::matrix(1.0, angle.to_radians().tan(), 0.0, 1.0, 0.0, 0.0)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Compose two transforms: self * other, i.e. `other` is applied first
    pub fn compose(&self, other: &Transform) -> Transform {
        Transform {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    /// Transform a point
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    pub fn apply_to_all(&self, points: &[Point]) -> Vec<Point> {
        points.iter().map(|p| self.apply(*p)).collect()
    }

    /// Parse an SVG transform list such as `translate(10 5) rotate(45, 0, 0)`.
    ///
    /// Functions are applied left to right as in SVG, so the result is
    /// `first ∘ second ∘ ...`. An empty string yields the identity.
    pub fn parse(input: &str) -> Result<Transform> {
        let mut out = Transform::IDENTITY;
        let mut rest = input.trim();

        while !rest.is_empty() {
            let open = rest
                .find('(')
                .ok_or_else(|| ConvertError::parse("transform", input, "expected '('"))?;
            let name = rest[..open].trim();
            let close = rest[open + 1..]
                .find(')')
                .ok_or_else(|| ConvertError::parse("transform", input, "missing ')'"))?;
            let args_str = &rest[open + 1..open + 1 + close];
            let args = parse_number_list(args_str)
                .ok_or_else(|| ConvertError::parse("transform", input, "invalid number"))?;

            let arity_err = |expected: &str| {
                ConvertError::parse(
                    "transform",
                    input,
                    format!("{} expects {} arguments, got {}", name, expected, args.len()),
                )
            };

            let m = match name {
                "translate" => match args[..] {
                    [tx] => Transform::translate(tx, 0.0),
                    [tx, ty] => Transform::translate(tx, ty),
                    _ => return Err(arity_err("1 or 2")),
                },
                "scale" => match args[..] {
                    [s] => Transform::scale(s, s),
                    [sx, sy] => Transform::scale(sx, sy),
                    _ => return Err(arity_err("1 or 2")),
                },
                "rotate" => match args[..] {
                    [angle] => Transform::rotate_degrees(angle),
                    [angle, cx, cy] => Transform::rotate_degrees_about(angle, cx, cy),
                    _ => return Err(arity_err("1 or 3")),
                },
                "skewX" => match args[..] {
                    [angle] => Transform::skew_x_degrees(angle),
                    _ => return Err(arity_err("1")),
                },
                "skewY" => match args[..] {
                    [angle] => Transform::skew_y_degrees(angle),
                    _ => return Err(arity_err("1")),
                },
                "matrix" => match args[..] {
                    [a, b, c, d, e, f] => Transform::matrix(a, b, c, d, e, f),
                    _ => return Err(arity_err("6")),
                },
                other => {
                    return Err(ConvertError::parse(
                        "transform",
                        input,
                        format!("unknown function '{}'", other),
                    ));
                }
            };

            out = out.compose(&m);
            rest = rest[open + 1 + close + 1..]
                .trim_start()
                .trim_start_matches(',')
                .trim_start();
        }

        Ok(out)
    }
}

/// Parse an SVG number list (`1,2 3`, `10-5`, `.5.5`); `None` if any entry is not a finite number
pub(crate) fn parse_number_list(input: &str) -> Option<Vec<f64>> {
    NumberListParser::from(input.trim())
        .map(|n| n.ok().filter(|v| v.is_finite()))
        .collect()
}
