//! Scene graph walk: accumulate transforms and flatten every path

use crate::bezier::DEFAULT_MAX_SUBDIVISION_DEPTH;
use crate::error::{ConvertError, Result};
use crate::path::flatten;
use crate::transform::Transform;
use crate::types::*;
use tracing::{debug, warn};

/// Deepest `<g>` nesting accepted before giving up
pub const DEFAULT_MAX_GROUP_DEPTH: usize = 64;

/// Options for [`traverse`]
#[derive(Debug, Clone)]
pub struct TraverseOptions {
    /// Flatness tolerance handed to the curve linearizer (default: 0.1)
    pub tolerance: f64,
    /// Maximum curve halvings (default: 20)
    pub max_subdivision_depth: usize,
    /// Maximum group nesting (default: 64)
    pub max_group_depth: usize,
    /// Leave out paths whose effective visibility is hidden or collapse (default: false)
    pub skip_hidden: bool,
}

impl Default for TraverseOptions {
    fn default() -> Self {
        Self {
            tolerance: 0.1,
            max_subdivision_depth: DEFAULT_MAX_SUBDIVISION_DEPTH,
            max_group_depth: DEFAULT_MAX_GROUP_DEPTH,
            skip_hidden: false,
        }
    }
}

/// Transform applied to the document's children before their own.
///
/// Fails with `UnitMismatch` when width and height use different units. With
/// a usable viewBox this is `scale(width / vb_width, height / vb_height)`
/// after `translate(-min_x, -min_y)`; a missing width or height takes the
/// viewBox extent, i.e. no scaling on that axis.
pub fn root_transform(doc: &SvgDocument) -> Result<Transform> {
    if let (Some(w), Some(h)) = (doc.width, doc.height) {
        if w.unit != h.unit {
            return Err(ConvertError::UnitMismatch {
                width: w.to_string(),
                height: h.to_string(),
            });
        }
    }

    let Some(vb) = doc.view_box else {
        return Ok(Transform::IDENTITY);
    };
    if vb.width == 0.0 || vb.height == 0.0 {
        warn!(
            width = vb.width,
            height = vb.height,
            "ignoring viewBox with zero extent"
        );
        return Ok(Transform::IDENTITY);
    }

    let width = doc.width.map_or(vb.width, |w| w.value);
    let height = doc.height.map_or(vb.height, |h| h.value);

    Ok(Transform::scale(width / vb.width, height / vb.height)
        .compose(&Transform::translate(-vb.min_x, -vb.min_y)))
}

/// Flatten every path in the document into shapes, in document order
pub fn traverse(doc: &SvgDocument, options: &TraverseOptions) -> Result<Vec<Shape>> {
    let root = root_transform(doc)?;
    walk(&doc.children, &root, Visibility::Visible, 0, options)
}

fn walk(
    nodes: &[SceneNode],
    inherited: &Transform,
    parent_visibility: Visibility,
    depth: usize,
    options: &TraverseOptions,
) -> Result<Vec<Shape>> {
    let mut shapes = Vec::new();

    for node in nodes {
        match node {
            SceneNode::Group(group) => {
                if depth >= options.max_group_depth {
                    return Err(ConvertError::RecursionLimitExceeded {
                        what: format!("group nesting at {}", node.label()),
                        limit: options.max_group_depth,
                    });
                }

                let visibility = group.visibility.resolve(parent_visibility);
                if visibility.is_hidden() {
                    debug!(node = %node.label(), "hidden group");
                }

                let transform = inherited.compose(&group.transform);
                shapes.extend(walk(
                    &group.children,
                    &transform,
                    visibility,
                    depth + 1,
                    options,
                )?);
            }
            SceneNode::Path(path) => {
                let visibility = path.visibility.resolve(parent_visibility);
                if visibility.is_hidden() {
                    debug!(node = %node.label(), "hidden path");
                    if options.skip_hidden {
                        continue;
                    }
                }

                let transform = inherited.compose(&path.transform);
                let points = flatten(
                    &path.data,
                    &transform,
                    options.tolerance,
                    options.max_subdivision_depth,
                )?;

                if points.is_empty() {
                    debug!(node = %node.label(), "path has no drawable segments");
                    continue;
                }
                shapes.push(Shape::new(path.filled, points));
            }
            SceneNode::Other { tag } => {
                debug!(tag = %tag, "ignoring unsupported element");
            }
        }
    }

    Ok(shapes)
}
