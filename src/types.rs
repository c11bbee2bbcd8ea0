use crate::transform::Transform;
use std::fmt;

/// 2D point in document or footprint coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point `t` of the way from `self` to `other`
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    pub fn distance(self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl std::ops::Add for Point {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Cubic Bezier segment: start, two handles, end
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

impl CubicBezier {
    pub const fn new(p0: Point, p1: Point, p2: Point, p3: Point) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Straight segment with handles on the chord at 1/3 and 2/3, which the
    /// flatness test sees as perfectly flat.
    pub fn line(from: Point, to: Point) -> Self {
        Self {
            p0: from,
            p1: from.lerp(to, 1.0 / 3.0),
            p2: from.lerp(to, 2.0 / 3.0),
            p3: to,
        }
    }
}

impl fmt::Display for CubicBezier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cubic ({}, {}) ({}, {}) ({}, {}) ({}, {})",
            self.p0.x, self.p0.y, self.p1.x, self.p1.y, self.p2.x, self.p2.y, self.p3.x, self.p3.y
        )
    }
}

/// One `M ...` run of a path: a start point followed by connected cubics
#[derive(Debug, Clone, PartialEq)]
pub struct Subpath {
    pub start: Point,
    pub segments: Vec<CubicBezier>,
    pub closed: bool,
}

impl Subpath {
    pub fn new(start: Point) -> Self {
        Self {
            start,
            segments: Vec::new(),
            closed: false,
        }
    }
}

/// Path geometry in the path's own coordinate space
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathData {
    pub subpaths: Vec<Subpath>,
}

impl PathData {
    /// True when no subpath has a drawable segment
    pub fn is_empty(&self) -> bool {
        self.subpaths.iter().all(|sp| sp.segments.is_empty())
    }

    pub fn segment_count(&self) -> usize {
        self.subpaths.iter().map(|sp| sp.segments.len()).sum()
    }
}

/// Flattened output polygon
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub filled: bool,
    pub points: Vec<Point>,
}

impl Shape {
    pub fn new(filled: bool, points: Vec<Point>) -> Self {
        Self { filled, points }
    }
}

/// Value of the `visibility` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
    Collapse,
    Inherit,
}

impl Visibility {
    pub fn from_attr(value: &str) -> Self {
        match value.trim() {
            "visible" => Visibility::Visible,
            "hidden" => Visibility::Hidden,
            "collapse" => Visibility::Collapse,
            _ => Visibility::Inherit,
        }
    }

    /// Effective visibility given the parent's effective visibility
    pub fn resolve(self, parent: Visibility) -> Visibility {
        match self {
            Visibility::Inherit => parent,
            v => v,
        }
    }

    pub fn is_hidden(self) -> bool {
        matches!(self, Visibility::Hidden | Visibility::Collapse)
    }
}

/// `<g>` element
#[derive(Debug, Clone, PartialEq)]
pub struct GroupNode {
    pub id: Option<String>,
    pub transform: Transform,
    pub visibility: Visibility,
    pub children: Vec<SceneNode>,
}

/// `<path>` element with its data already parsed
#[derive(Debug, Clone, PartialEq)]
pub struct PathNode {
    pub id: Option<String>,
    pub transform: Transform,
    pub visibility: Visibility,
    pub filled: bool,
    pub data: PathData,
}

/// All node kinds the traverser distinguishes
#[derive(Debug, Clone, PartialEq)]
pub enum SceneNode {
    Group(GroupNode),
    Path(PathNode),
    /// Unsupported element, kept only so traversal can report it
    Other { tag: String },
}

impl SceneNode {
    pub fn label(&self) -> String {
        match self {
            SceneNode::Group(g) => format!("<g id={:?}>", g.id.as_deref().unwrap_or("")),
            SceneNode::Path(p) => format!("<path id={:?}>", p.id.as_deref().unwrap_or("")),
            SceneNode::Other { tag } => format!("<{}>", tag),
        }
    }
}

/// Unit suffixes accepted on root width/height
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Px,
    Pt,
    Pc,
    Mm,
    Cm,
    In,
}

impl LengthUnit {
    pub const ALL: [LengthUnit; 6] = [
        LengthUnit::Px,
        LengthUnit::Pt,
        LengthUnit::Pc,
        LengthUnit::Mm,
        LengthUnit::Cm,
        LengthUnit::In,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            LengthUnit::Px => "px",
            LengthUnit::Pt => "pt",
            LengthUnit::Pc => "pc",
            LengthUnit::Mm => "mm",
            LengthUnit::Cm => "cm",
            LengthUnit::In => "in",
        }
    }
}

/// Root width or height with its unit; units are only compared, never converted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    pub value: f64,
    pub unit: LengthUnit,
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

/// Parsed `viewBox` attribute
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

/// Parsed SVG document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SvgDocument {
    pub width: Option<Length>,
    pub height: Option<Length>,
    pub view_box: Option<ViewBox>,
    pub children: Vec<SceneNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum HorizontalAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum VerticalAlign {
    Top,
    #[default]
    Center,
    Bottom,
}
