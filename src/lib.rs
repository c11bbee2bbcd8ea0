//! # svg2kicadmod
//!
//! Convert SVG line art into KiCad footprint (`.kicad_mod`) polygons.
//!
//! ## Pipeline
//!
//! 1. Parse the document into a scene graph of groups and paths
//! 2. Walk the graph, composing each node's transform with its ancestors'
//! 3. Flatten every Bezier segment into line segments within a tolerance
//! 4. Align the drawing to the origin and scale it to the requested size
//! 5. Emit one `fp_poly` per path
//!
//! ## Example
//!
//! ```rust,ignore
//! use svg2kicadmod::{ConvertOptions, convert_svg};
//!
//! let svg = std::fs::read_to_string("logo.svg").unwrap();
//! let footprint = convert_svg(&svg, &ConvertOptions::default()).unwrap();
//! std::fs::write("logo.kicad_mod", footprint).unwrap();
//! ```

pub mod bezier;
pub mod bounds;
pub mod convert;
pub mod error;
pub mod kicad;
pub mod parser;
pub mod path;
pub mod style;
pub mod transform;
pub mod traverse;
pub mod types;

// Re-export commonly used items
pub use bounds::{Bounds, align, bounding_box, resolve_scale_factor, scale};
pub use convert::{ConvertOptions, convert_document, convert_file, convert_shapes, convert_svg};
pub use error::{ConvertError, Result};
pub use kicad::{FootprintOptions, write_footprint};
pub use parser::{load_svg, parse_svg};
pub use transform::Transform;
pub use traverse::{TraverseOptions, traverse};
pub use types::{HorizontalAlign, Point, Shape, SvgDocument, VerticalAlign};
