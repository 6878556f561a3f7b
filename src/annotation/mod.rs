//! Annotation model and JSON parsing.
//!
//! Annotation files come in two layouts (see [`FormatMode`]). Both are parsed
//! into the same typed [`Document`]: an ordered list of [`Record`]s, each a
//! [`Shape::Rectangle`] or a [`Shape::Polygon`] with an optional label.
//!
//! # Example
//!
//! ```
//! use labelviz::annotation::{parse_document_str, FormatMode, Shape};
//!
//! let doc = parse_document_str(
//!     r#"[{"x": 10, "y": 10, "w": 20, "h": 20, "labelType": "Car"}]"#,
//!     FormatMode::Mixed,
//! )
//! .unwrap();
//!
//! assert_eq!(doc.records.len(), 1);
//! assert!(matches!(doc.records[0].shape, Shape::Rectangle { x: 10, .. }));
//! assert_eq!(doc.records[0].label.as_deref(), Some("Car"));
//! ```

mod label;
mod model;
mod parse;

pub use label::{label_text, resolve_label};
pub use model::{Document, FormatMode, Record, Shape, Vertex};
pub use parse::{parse_document, parse_document_slice, parse_document_str, ParseError};
