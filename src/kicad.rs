//! `.kicad_mod` footprint writer

use crate::types::{Point, Shape};
use std::fmt::Write;

/// Points per line in a `pts` list
const POINTS_PER_LINE: usize = 10;

/// Continuation indent for wrapped `pts` lists
const PTS_INDENT: &str = "                ";

/// Options for [`write_footprint`]
#[derive(Debug, Clone)]
pub struct FootprintOptions {
    /// Module name in the header (default: "ConvertedSvgModule")
    pub name: String,
    /// Board layer every polygon is placed on (default: "F.SilkS")
    pub layer: String,
    /// Outline width in mm (default: 0.01)
    pub line_width: f64,
}

impl Default for FootprintOptions {
    fn default() -> Self {
        Self {
            name: "ConvertedSvgModule".to_string(),
            layer: "F.SilkS".to_string(),
            line_width: 0.01,
        }
    }
}

/// Format a number with 6 decimal places
fn f(n: f64) -> String {
    // Handle -0.0 case
    let n = if n == 0.0 { 0.0 } else { n };
    format!("{:.6}", n)
}

/// `pts` body: a break after the first point and after every tenth one from there
fn format_points(points: &[Point]) -> String {
    let mut out = String::new();
    for (i, p) in points.iter().enumerate() {
        let _ = write!(out, "(xy {} {}) ", f(p.x), f(p.y));
        if i % POINTS_PER_LINE == 0 {
            out.push('\n');
            out.push_str(PTS_INDENT);
        }
    }
    out.push('\n');
    out
}

/// One `fp_poly` line.
///
/// KiCad always fills `fp_poly`, so the shape's fill flag has no effect on
/// the output.
fn format_polygon(shape: &Shape, options: &FootprintOptions) -> String {
    format!(
        "  (fp_poly (pts {}) (layer {}) (width {}))\n",
        format_points(&shape.points),
        options.layer,
        f(options.line_width)
    )
}

/// Render shapes as a complete footprint file
pub fn write_footprint(shapes: &[Shape], options: &FootprintOptions) -> String {
    let mut out = format!("(module {} (layer F.Cu)\n", options.name);
    for shape in shapes {
        out.push_str(&format_polygon(shape, options));
    }
    out.push_str("\n)\n");
    out
}
