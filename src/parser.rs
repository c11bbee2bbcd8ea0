use crate::error::{ConvertError, Result};
use crate::path::parse_path_data;
use crate::style::is_filled;
use crate::transform::{Transform, parse_number_list};
use crate::types::*;
use quick_xml::Reader;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use std::collections::HashMap;
use std::path::Path;
use tracing::trace;

/// Parse a root `width`/`height` value such as "210mm" or "640".
///
/// No suffix means `px`. Percentages carry no absolute size and give `None`.
pub fn parse_length(value: &str) -> Result<Option<Length>> {
    let s = value.trim();

    if let Some(number) = s.strip_suffix('%') {
        number
            .trim()
            .parse::<f64>()
            .map_err(|e| ConvertError::parse("length", value, e.to_string()))?;
        return Ok(None);
    }

    let (number, unit) = LengthUnit::ALL
        .iter()
        .find_map(|u| s.strip_suffix(u.suffix()).map(|n| (n, *u)))
        .unwrap_or((s, LengthUnit::Px));

    let value_num = number
        .trim()
        .parse::<f64>()
        .map_err(|e| ConvertError::parse("length", value, e.to_string()))?;

    Ok(Some(Length {
        value: value_num,
        unit,
    }))
}

/// Parse `viewBox="min-x min-y width height"`
pub fn parse_view_box(value: &str) -> Result<ViewBox> {
    match parse_number_list(value).as_deref() {
        Some(&[min_x, min_y, width, height]) => Ok(ViewBox {
            min_x,
            min_y,
            width,
            height,
        }),
        _ => Err(ConvertError::parse(
            "viewBox",
            value,
            "expected four numbers",
        )),
    }
}

fn local_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn collect_attributes(e: &BytesStart) -> HashMap<String, String> {
    let mut attrs = HashMap::new();
    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref()).unwrap_or("");
        let raw = std::str::from_utf8(&attr.value).unwrap_or("");
        let value = quick_xml::escape::unescape(raw)
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| raw.to_string());
        attrs.insert(key.to_string(), value);
    }
    attrs
}

fn xml_error(reader: &Reader<&[u8]>, e: quick_xml::Error) -> ConvertError {
    ConvertError::Xml(format!("{} at byte {}", e, reader.buffer_position()))
}

fn node_transform(attrs: &HashMap<String, String>) -> Result<Transform> {
    match attrs.get("transform") {
        Some(t) => Transform::parse(t),
        None => Ok(Transform::IDENTITY),
    }
}

fn node_visibility(attrs: &HashMap<String, String>) -> Visibility {
    attrs
        .get("visibility")
        .map(|v| Visibility::from_attr(v))
        .unwrap_or(Visibility::Inherit)
}

fn group_from(attrs: &HashMap<String, String>) -> Result<GroupNode> {
    Ok(GroupNode {
        id: attrs.get("id").cloned(),
        transform: node_transform(attrs)?,
        visibility: node_visibility(attrs),
        children: Vec::new(),
    })
}

fn path_from(attrs: &HashMap<String, String>) -> Result<PathNode> {
    let data = match attrs.get("d") {
        Some(d) => parse_path_data(d)?,
        None => PathData::default(),
    };

    Ok(PathNode {
        id: attrs.get("id").cloned(),
        transform: node_transform(attrs)?,
        visibility: node_visibility(attrs),
        filled: is_filled(attrs.get("style").map(String::as_str)),
        data,
    })
}

fn root_from(attrs: &HashMap<String, String>) -> Result<SvgDocument> {
    let width = match attrs.get("width") {
        Some(w) => parse_length(w)?,
        None => None,
    };
    let height = match attrs.get("height") {
        Some(h) => parse_length(h)?,
        None => None,
    };
    let view_box = match attrs.get("viewBox") {
        Some(vb) => Some(parse_view_box(vb)?),
        None => None,
    };

    Ok(SvgDocument {
        width,
        height,
        view_box,
        children: Vec::new(),
    })
}

fn skip_element(reader: &mut Reader<&[u8]>, end: &BytesEnd, buf: &mut Vec<u8>) -> Result<()> {
    let result = reader.read_to_end_into(end.name(), buf);
    buf.clear();
    result.map(|_| ()).map_err(|e| xml_error(reader, e))
}

/// Parse an SVG string into a scene graph.
///
/// Only `<g>` and `<path>` become drawable nodes; every other element is
/// recorded as [`SceneNode::Other`] and its content skipped. Transforms,
/// path data and lengths are parsed here, so a malformed document fails
/// before traversal starts.
pub fn parse_svg(xml: &str) -> Result<SvgDocument> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut document: Option<SvgDocument> = None;
    // Open groups; the bottom entry collects the root's children
    let mut stack: Vec<GroupNode> = Vec::new();
    let mut buf = Vec::new();
    let mut skip_buf = Vec::new();

    loop {
        let (name, attrs, end) = match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => (
                local_name(e),
                collect_attributes(e),
                Some(e.to_end().into_owned()),
            ),
            Ok(Event::Empty(ref e)) => (local_name(e), collect_attributes(e), None),
            Ok(Event::End(_)) => {
                buf.clear();
                let Some(group) = stack.pop() else {
                    continue;
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(SceneNode::Group(group)),
                    None => {
                        if let Some(doc) = document.as_mut() {
                            doc.children = group.children;
                        }
                        break;
                    }
                }
                continue;
            }
            Ok(Event::Eof) => {
                if !stack.is_empty() {
                    return Err(ConvertError::Xml(
                        "unexpected end of document inside an open element".to_string(),
                    ));
                }
                break;
            }
            Err(e) => return Err(xml_error(&reader, e)),
            _ => {
                buf.clear();
                continue;
            }
        };
        buf.clear();

        if document.is_none() {
            if name == "svg" {
                document = Some(root_from(&attrs)?);
                if end.is_none() {
                    break;
                }
                stack.push(GroupNode {
                    id: attrs.get("id").cloned(),
                    transform: Transform::IDENTITY,
                    visibility: node_visibility(&attrs),
                    children: Vec::new(),
                });
            } else if let Some(end) = &end {
                skip_element(&mut reader, end, &mut skip_buf)?;
            }
            continue;
        }

        let node = match name.as_str() {
            "g" => {
                let group = group_from(&attrs)?;
                if end.is_some() {
                    stack.push(group);
                    continue;
                }
                SceneNode::Group(group)
            }
            "path" => SceneNode::Path(path_from(&attrs)?),
            _ => SceneNode::Other { tag: name },
        };

        trace!(node = %node.label(), "parsed element");
        if let Some(end) = &end {
            skip_element(&mut reader, end, &mut skip_buf)?;
        }
        if let Some(parent) = stack.last_mut() {
            parent.children.push(node);
        }
    }

    document.ok_or_else(|| ConvertError::Xml("no <svg> root element".to_string()))
}

/// Read and parse an SVG file
pub fn load_svg<P: AsRef<Path>>(path: P) -> Result<SvgDocument> {
    let path_ref = path.as_ref();
    let content = std::fs::read_to_string(path_ref).map_err(|source| ConvertError::Io {
        path: path_ref.display().to_string(),
        source,
    })?;
    parse_svg(&content)
}
