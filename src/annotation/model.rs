//! Typed annotation records.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::VizError;

/// A polygon vertex in integer pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Vertex {
    pub x: i32,
    pub y: i32,
}

impl Vertex {
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Vertex {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl From<Vertex> for imageproc::point::Point<i32> {
    fn from(v: Vertex) -> Self {
        imageproc::point::Point::new(v.x, v.y)
    }
}

/// The geometry of one annotation record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// Axis-aligned box with top-left corner `(x, y)` and size `w` x `h`.
    Rectangle { x: i32, y: i32, w: i32, h: i32 },
    /// Closed contour through `points`, in order. Never empty.
    Polygon { points: Vec<Vertex> },
}

impl Shape {
    /// Top-left and bottom-right corners of a rectangle, as written.
    ///
    /// Returns `None` for polygons.
    pub fn rect_corners(&self) -> Option<(Vertex, Vertex)> {
        match *self {
            Shape::Rectangle { x, y, w, h } => Some((
                Vertex::new(x, y),
                Vertex::new(x.saturating_add(w), y.saturating_add(h)),
            )),
            Shape::Polygon { .. } => None,
        }
    }

    /// Arithmetic mean of the polygon vertices, truncated toward zero.
    ///
    /// Returns `None` for rectangles.
    pub fn centroid(&self) -> Option<Vertex> {
        let Shape::Polygon { points } = self else {
            return None;
        };
        if points.is_empty() {
            return None;
        }
        let n = points.len() as i64;
        let (sx, sy) = points.iter().fold((0i64, 0i64), |(sx, sy), p| {
            (sx + i64::from(p.x), sy + i64::from(p.y))
        });
        Some(Vertex::new((sx / n) as i32, (sy / n) as i32))
    }
}

/// One shape to draw, with its optional label text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Record {
    pub shape: Shape,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Record {
    pub fn rectangle(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            shape: Shape::Rectangle { x, y, w, h },
            label: None,
        }
    }

    pub fn polygon(points: impl IntoIterator<Item = Vertex>) -> Self {
        Self {
            shape: Shape::Polygon {
                points: points.into_iter().collect(),
            },
            label: None,
        }
    }

    /// Builder-style helper to attach a label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// The normalized content of one annotation file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Recognized records, in file order.
    pub records: Vec<Record>,
    /// Entries that were neither a rectangle nor a usable polygon.
    pub ignored: usize,
}

impl Document {
    pub fn rectangle_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.shape, Shape::Rectangle { .. }))
            .count()
    }

    pub fn polygon_count(&self) -> usize {
        self.records.len() - self.rectangle_count()
    }
}

/// Which annotation layout a batch expects.
///
/// The two layouts differ in which records they recognize, in how a lone
/// top-level object is accepted, and in whether `alias` can supply a label.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatMode {
    /// Rectangles (`x`,`y`,`w`,`h`) and polygons (`points`).
    #[default]
    Mixed,
    /// Polygons only; a lone object must contain `points`.
    PolygonOnly,
}

impl FormatMode {
    pub fn as_str(self) -> &'static str {
        match self {
            FormatMode::Mixed => "mixed",
            FormatMode::PolygonOnly => "polygon",
        }
    }
}

impl fmt::Display for FormatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatMode {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mixed" | "rect" | "rectangle" => Ok(FormatMode::Mixed),
            "polygon" | "polygon-only" => Ok(FormatMode::PolygonOnly),
            other => Err(VizError::UnsupportedFormat(format!(
                "'{}' (supported: mixed, polygon)",
                other
            ))),
        }
    }
}
