//! End-to-end conversion: SVG text in, footprint text out

use crate::bounds::{Bounds, align, bounding_box, resolve_scale_factor, scale};
use crate::error::{ConvertError, Result};
use crate::kicad::{FootprintOptions, write_footprint};
use crate::parser::{load_svg, parse_svg};
use crate::traverse::{TraverseOptions, traverse};
use crate::types::{HorizontalAlign, Shape, SvgDocument, VerticalAlign};
use std::path::Path;
use tracing::info;

/// Options for a full conversion
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub traverse: TraverseOptions,
    /// Target width in mm, 0 = unconstrained (default: 0)
    pub target_width: f64,
    /// Target height in mm, 0 = unconstrained (default: 0)
    pub target_height: f64,
    /// Horizontal anchor moved to the origin (default: center)
    pub horizontal_align: HorizontalAlign,
    /// Vertical anchor moved to the origin (default: center)
    pub vertical_align: VerticalAlign,
    pub footprint: FootprintOptions,
}

fn log_stats(bounds: &Bounds) {
    let center = bounds.center();
    info!(
        "Stats - min: ({:.6}, {:.6}), center: ({:.6}, {:.6}), max: ({:.6}, {:.6})",
        bounds.min_x, bounds.min_y, center.x, center.y, bounds.max_x, bounds.max_y
    );
}

/// Flatten, align and scale a parsed document
pub fn convert_document(doc: &SvgDocument, options: &ConvertOptions) -> Result<Vec<Shape>> {
    if let (Some(w), Some(h)) = (doc.width, doc.height) {
        info!("Document size: {} x {}", w, h);
    }

    let shapes = traverse(doc, &options.traverse)?;
    info!("Found {} shapes", shapes.len());
    log_stats(&bounding_box(&shapes)?);

    info!(
        "Aligning drawing ({:?}, {:?}) to (0, 0)",
        options.horizontal_align, options.vertical_align
    );
    let shapes = align(&shapes, options.horizontal_align, options.vertical_align)?;
    let bounds = bounding_box(&shapes)?;
    log_stats(&bounds);

    let factor = resolve_scale_factor(&bounds, options.target_width, options.target_height);
    if factor == 1.0 {
        return Ok(shapes);
    }

    info!("Scaling by {:.6}", factor);
    let shapes = scale(&shapes, factor);
    log_stats(&bounding_box(&shapes)?);
    Ok(shapes)
}

/// Flatten, align and scale the drawing, returning the shapes that would be written
pub fn convert_shapes(svg: &str, options: &ConvertOptions) -> Result<Vec<Shape>> {
    convert_document(&parse_svg(svg)?, options)
}

/// Convert SVG text into `.kicad_mod` text
pub fn convert_svg(svg: &str, options: &ConvertOptions) -> Result<String> {
    let shapes = convert_shapes(svg, options)?;
    Ok(write_footprint(&shapes, &options.footprint))
}

/// Convert an SVG file into a footprint file.
///
/// The output is only written once conversion has succeeded.
pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: &ConvertOptions,
) -> Result<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    let doc = load_svg(input)?;
    let shapes = convert_document(&doc, options)?;
    let footprint = write_footprint(&shapes, &options.footprint);

    std::fs::write(output, footprint).map_err(|source| ConvertError::Io {
        path: output.display().to_string(),
        source,
    })?;
    info!("Wrote {}", output.display());
    Ok(())
}
