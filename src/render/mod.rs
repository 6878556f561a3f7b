//! The annotation renderer.
//!
//! Draws a parsed [`Document`] onto an RGB image buffer:
//!
//! - rectangles get an unfilled outline and a label at their top-left corner
//! - polygons get a closed outline, translucent shading, and a label centered
//!   on their centroid
//!
//! Records are drawn in document order, so later records paint over earlier
//! ones. Everything is clipped to the image; coordinates may lie anywhere.

mod stroke;
pub mod style;
pub mod text;

pub use stroke::{draw_closed_outline, shade_polygon};
pub use style::RenderStyle;
pub use text::{TextAnchor, TextRenderer, TextStyle};

use image::{Rgb, RgbImage};

use crate::annotation::{Document, Record, Shape, Vertex};

/// Draws documents with a fixed style and text backend.
#[derive(Debug, Default)]
pub struct Renderer {
    style: RenderStyle,
    text: TextRenderer,
}

impl Renderer {
    pub fn new(style: RenderStyle, text: TextRenderer) -> Self {
        Self { style, text }
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// Draw every record of `doc` onto `image`.
    pub fn render(&self, image: &mut RgbImage, doc: &Document) {
        for record in &doc.records {
            self.render_record(image, record);
        }
    }

    /// Draw a single record onto `image`.
    pub fn render_record(&self, image: &mut RgbImage, record: &Record) {
        let outline = Rgb(self.style.outline_color);
        let thickness = self.style.outline_thickness;

        match &record.shape {
            Shape::Rectangle { .. } => {
                let Some((tl, br)) = record.shape.rect_corners() else {
                    return;
                };
                let corners = [tl, Vertex::new(br.x, tl.y), br, Vertex::new(tl.x, br.y)];
                draw_closed_outline(image, &corners, outline, thickness);

                if let Some(label) = &record.label {
                    let anchor = self.style.box_label_anchor(tl.x, tl.y);
                    self.text.draw(
                        image,
                        label,
                        anchor,
                        TextAnchor::BaselineLeft,
                        self.text_style(self.style.box_label_size),
                    );
                }
            }
            Shape::Polygon { points } => {
                if points.is_empty() {
                    return;
                }
                draw_closed_outline(image, points, outline, thickness);
                shade_polygon(image, points, outline, self.style.fill_alpha);

                if let (Some(label), Some(center)) = (&record.label, record.shape.centroid()) {
                    self.text.draw(
                        image,
                        label,
                        (center.x, center.y),
                        TextAnchor::Center,
                        self.text_style(self.style.polygon_label_size),
                    );
                }
            }
        }
    }

    fn text_style(&self, size_px: f32) -> TextStyle {
        TextStyle {
            size_px,
            weight: self.style.text_weight,
            color: Rgb(self.style.text_color),
        }
    }
}

/// Draw `doc` onto `image` with the default style and bitmap font.
pub fn render_document(image: &mut RgbImage, doc: &Document) {
    Renderer::default().render(image, doc);
}
