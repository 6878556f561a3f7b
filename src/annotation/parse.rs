//! Annotation document parsing.
//!
//! Raw JSON is normalized into a sequence of record objects first, then each
//! object is dispatched to a [`Shape`] variant. Entries that match neither
//! variant are counted and dropped; they never abort the document.

use serde_json::{Map, Value};

use super::label::resolve_label;
use super::model::{Document, FormatMode, Record, Shape, Vertex};
use crate::error::DocumentError;

const RECT_KEYS: [&str; 4] = ["x", "y", "w", "h"];

/// Parse a JSON value into a document for the given mode.
///
/// # Errors
/// Returns [`DocumentError`] when the top-level value has a shape the mode
/// does not accept. Individual bad records are not errors.
pub fn parse_document(value: &Value, mode: FormatMode) -> Result<Document, DocumentError> {
    let entries = normalize(value, mode)?;

    let mut doc = Document::default();
    for (idx, entry) in entries.iter().enumerate() {
        match parse_record(entry, mode) {
            Some(record) => doc.records.push(record),
            None => {
                tracing::debug!(index = idx, mode = %mode, "ignoring unrecognized record");
                doc.ignored += 1;
            }
        }
    }

    Ok(doc)
}

/// Parse an annotation document from a JSON string.
pub fn parse_document_str(json: &str, mode: FormatMode) -> Result<Document, ParseError> {
    let value: Value = serde_json::from_str(json)?;
    Ok(parse_document(&value, mode)?)
}

/// Parse an annotation document from JSON bytes.
pub fn parse_document_slice(bytes: &[u8], mode: FormatMode) -> Result<Document, ParseError> {
    let value: Value = serde_json::from_slice(bytes)?;
    Ok(parse_document(&value, mode)?)
}

/// Failure to get from raw text to a [`Document`].
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Turn the top-level value into the list of entries to dispatch.
fn normalize(value: &Value, mode: FormatMode) -> Result<Vec<&Value>, DocumentError> {
    match (value, mode) {
        (Value::Array(items), _) => Ok(items.iter().collect()),
        (Value::Object(_), FormatMode::Mixed) => Ok(vec![value]),
        (Value::Object(obj), FormatMode::PolygonOnly) => {
            if obj.contains_key("points") {
                Ok(vec![value])
            } else {
                Err(DocumentError::MissingPoints)
            }
        }
        (other, _) => Err(DocumentError::UnrecognizedShape {
            found: json_kind(other),
        }),
    }
}

fn parse_record(entry: &Value, mode: FormatMode) -> Option<Record> {
    let obj = entry.as_object()?;

    match mode {
        FormatMode::Mixed => {
            if RECT_KEYS.iter().all(|k| obj.contains_key(*k)) {
                let shape = parse_rectangle(obj)?;
                Some(Record {
                    shape,
                    label: resolve_label(obj, true),
                })
            } else if obj.contains_key("points") {
                parse_polygon_record(obj)
            } else {
                None
            }
        }
        FormatMode::PolygonOnly => parse_polygon_record(obj),
    }
}

fn parse_polygon_record(obj: &Map<String, Value>) -> Option<Record> {
    let points = parse_points(obj.get("points")?)?;
    Some(Record {
        shape: Shape::Polygon { points },
        label: resolve_label(obj, false),
    })
}

fn parse_rectangle(obj: &Map<String, Value>) -> Option<Shape> {
    let [x, y, w, h] = RECT_KEYS.map(|k| obj.get(k).and_then(as_pixel));
    Some(Shape::Rectangle {
        x: x?,
        y: y?,
        w: w?,
        h: h?,
    })
}

/// Parse a `points` value into vertices.
///
/// Accepts `[[x, y], ...]`, the contour form `[[[x, y]], ...]`, and the flat
/// form `[x1, y1, x2, y2, ...]`: all numbers are collected in order and then
/// paired up. An empty list or an odd number count yields `None`.
fn parse_points(value: &Value) -> Option<Vec<Vertex>> {
    let mut coords = Vec::new();
    collect_coords(value, &mut coords)?;

    if coords.is_empty() || coords.len() % 2 != 0 {
        return None;
    }

    Some(
        coords
            .chunks_exact(2)
            .map(|pair| Vertex::new(pair[0], pair[1]))
            .collect(),
    )
}

fn collect_coords(value: &Value, out: &mut Vec<i32>) -> Option<()> {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_coords(item, out)?;
            }
            Some(())
        }
        other => {
            out.push(as_pixel(other)?);
            Some(())
        }
    }
}

/// Numeric JSON value truncated toward zero. Out-of-range values saturate.
fn as_pixel(value: &Value) -> Option<i32> {
    let v = value.as_f64()?;
    if v.is_finite() {
        Some(v.trunc() as i32)
    } else {
        None
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
