//! Render style configuration.
//!
//! Defaults reproduce the stock look: green 2px outlines, blue bold labels,
//! 30% polygon shading. Any subset of fields can be overridden from YAML:
//!
//! ```yaml
//! outline_color: [255, 128, 0]
//! fill_alpha: 0.5
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::VizError;

const MAX_LABEL_SIZE: f32 = 1024.0;
const MAX_OUTLINE_THICKNESS: u32 = 64;
const MAX_TEXT_WEIGHT: u32 = 16;

/// Colors, stroke and text settings used by the renderer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderStyle {
    /// RGB color of rectangle and polygon outlines (also the polygon fill).
    pub outline_color: [u8; 3],
    /// Outline stroke width in pixels.
    pub outline_thickness: u32,
    /// RGB color of label text.
    pub text_color: [u8; 3],
    /// Label height in pixels for rectangle records.
    pub box_label_size: f32,
    /// Label height in pixels for polygon records.
    pub polygon_label_size: f32,
    /// Stroke weight of label text; 1 is regular.
    pub text_weight: u32,
    /// Weight of the fill color when shading polygons (0.0..=1.0).
    pub fill_alpha: f32,
    /// Distance above the box top edge for the label baseline.
    pub box_label_offset_above: i32,
    /// Distance below the box top edge for the label baseline.
    pub box_label_offset_below: i32,
    /// Boxes whose top edge is at or above this row get their label below.
    pub box_label_flip_threshold: i32,
    /// JPEG quality used when writing output images (1..=100).
    pub jpeg_quality: u8,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            outline_color: [0, 255, 0],
            outline_thickness: 2,
            text_color: [0, 0, 255],
            box_label_size: 16.0,
            polygon_label_size: 24.0,
            text_weight: 2,
            fill_alpha: 0.3,
            box_label_offset_above: 10,
            box_label_offset_below: 20,
            box_label_flip_threshold: 20,
            jpeg_quality: 95,
        }
    }
}

impl RenderStyle {
    /// Load a style from a YAML file. Missing keys keep their defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self, VizError> {
        let file = File::open(path).map_err(VizError::Io)?;
        let style: RenderStyle = serde_yaml::from_reader(BufReader::new(file)).map_err(|source| {
            VizError::StyleParse {
                path: path.to_path_buf(),
                source,
            }
        })?;

        style.check().map_err(|message| VizError::StyleInvalid {
            path: path.to_path_buf(),
            message,
        })?;
        Ok(style)
    }

    /// Parse a style from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Reject values the renderer cannot honor.
    pub fn check(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.fill_alpha) {
            return Err(format!(
                "fill_alpha must be within 0.0..=1.0, got {}",
                self.fill_alpha
            ));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(format!(
                "jpeg_quality must be within 1..=100, got {}",
                self.jpeg_quality
            ));
        }
        for (name, size) in [
            ("box_label_size", self.box_label_size),
            ("polygon_label_size", self.polygon_label_size),
        ] {
            if !(size > 0.0 && size <= MAX_LABEL_SIZE) {
                return Err(format!(
                    "{name} must be within 0.0..={MAX_LABEL_SIZE}, got {size}"
                ));
            }
        }
        if !(1..=MAX_OUTLINE_THICKNESS).contains(&self.outline_thickness) {
            return Err(format!(
                "outline_thickness must be within 1..={MAX_OUTLINE_THICKNESS}, got {}",
                self.outline_thickness
            ));
        }
        if !(1..=MAX_TEXT_WEIGHT).contains(&self.text_weight) {
            return Err(format!(
                "text_weight must be within 1..={MAX_TEXT_WEIGHT}, got {}",
                self.text_weight
            ));
        }
        Ok(())
    }

    /// Baseline-left anchor for the label of a box whose top-left is `(x, y)`.
    pub fn box_label_anchor(&self, x: i32, y: i32) -> (i32, i32) {
        if y > self.box_label_flip_threshold {
            (x, y.saturating_sub(self.box_label_offset_above))
        } else {
            (x, y.saturating_add(self.box_label_offset_below))
        }
    }
}
