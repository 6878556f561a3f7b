//! Label text drawing.
//!
//! Two backends:
//! - [`TextRenderer::Bitmap`] draws the built-in 8x8 font scaled up by an
//!   integer factor. It needs no font files but only covers Latin, Greek and a
//!   few symbol blocks; unknown characters are drawn as `?`.
//! - [`TextRenderer::TrueType`] draws with a user-supplied TTF/OTF font and
//!   covers whatever scripts that font has.

use std::fs;
use std::path::Path;

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use font8x8::{UnicodeFonts, BASIC_FONTS, BOX_FONTS, GREEK_FONTS, LATIN_FONTS, MISC_FONTS};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;

use crate::error::VizError;

const GLYPH_CELL: u32 = 8;
const MAX_BITMAP_SCALE: f32 = 1024.0;

/// Where the `(x, y)` passed to [`TextRenderer::draw`] sits on the text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    /// Left end of the baseline.
    BaselineLeft,
    /// Center of the text's bounding box.
    Center,
}

/// Text styling for a single draw call.
#[derive(Clone, Copy, Debug)]
pub struct TextStyle {
    pub size_px: f32,
    pub weight: u32,
    pub color: Rgb<u8>,
}

/// Draws label strings onto RGB images.
#[derive(Default)]
pub enum TextRenderer {
    #[default]
    Bitmap,
    TrueType(Box<FontVec>),
}

impl std::fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextRenderer::Bitmap => f.write_str("TextRenderer::Bitmap"),
            TextRenderer::TrueType(_) => f.write_str("TextRenderer::TrueType"),
        }
    }
}

impl TextRenderer {
    /// Load a TrueType/OpenType font file.
    pub fn from_font_file(path: &Path) -> Result<Self, VizError> {
        let bytes = fs::read(path).map_err(|e| VizError::FontLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let font = FontVec::try_from_vec(bytes).map_err(|e| VizError::FontLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(TextRenderer::TrueType(Box::new(font)))
    }

    /// Width and height in pixels of `text` at `size_px`, ignoring weight.
    pub fn measure(&self, text: &str, size_px: f32) -> (u32, u32) {
        match self {
            TextRenderer::Bitmap => {
                let cell = GLYPH_CELL.saturating_mul(bitmap_scale(size_px));
                let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
                (cell.saturating_mul(chars), cell)
            }
            TextRenderer::TrueType(font) => text_size(PxScale::from(size_px), &**font, text),
        }
    }

    /// Draw `text` with its `anchor` point at `(x, y)`.
    ///
    /// Pixels falling outside the image are clipped.
    pub fn draw(
        &self,
        image: &mut RgbImage,
        text: &str,
        (x, y): (i32, i32),
        anchor: TextAnchor,
        style: TextStyle,
    ) {
        if text.is_empty() {
            return;
        }

        let (w, h) = self.measure(text, style.size_px);
        let (x, y) = (i64::from(x), i64::from(y));
        let left = match anchor {
            TextAnchor::BaselineLeft => x,
            TextAnchor::Center => x - i64::from(w / 2),
        };
        let top = match (anchor, self) {
            (TextAnchor::Center, _) => y - i64::from(h / 2),
            (TextAnchor::BaselineLeft, TextRenderer::Bitmap) => y - i64::from(h),
            (TextAnchor::BaselineLeft, TextRenderer::TrueType(font)) => {
                let ascent = (**font).as_scaled(PxScale::from(style.size_px)).ascent();
                y - ascent.round() as i64
            }
        };

        let weight = style.weight.max(1);
        let right = left + i64::from(w) + i64::from(weight);
        let bottom = top + i64::from(h);
        if right <= 0
            || bottom <= 0
            || left >= i64::from(image.width())
            || top >= i64::from(image.height())
        {
            return;
        }

        // Bold by overstriking one pixel to the right per extra weight step.
        for dx in 0..i64::from(weight) {
            match self {
                TextRenderer::Bitmap => {
                    draw_bitmap_text(image, text, left + dx, top, style.size_px, style.color)
                }
                TextRenderer::TrueType(font) => {
                    let (Ok(px), Ok(py)) = (i32::try_from(left + dx), i32::try_from(top)) else {
                        return;
                    };
                    draw_text_mut(
                        image,
                        style.color,
                        px,
                        py,
                        PxScale::from(style.size_px),
                        &**font,
                        text,
                    )
                }
            }
        }
    }
}

fn bitmap_scale(size_px: f32) -> u32 {
    ((size_px / GLYPH_CELL as f32).round().min(MAX_BITMAP_SCALE) as u32).max(1)
}

fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| GREEK_FONTS.get(c))
        .or_else(|| BOX_FONTS.get(c))
        .or_else(|| MISC_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn draw_bitmap_text(
    image: &mut RgbImage,
    text: &str,
    left: i64,
    top: i64,
    size_px: f32,
    color: Rgb<u8>,
) {
    let scale = bitmap_scale(size_px);
    let cell = i64::from(GLYPH_CELL) * i64::from(scale);
    let (width, height) = (i64::from(image.width()), i64::from(image.height()));
    if top >= height || top + cell <= 0 {
        return;
    }

    for (i, c) in text.chars().enumerate() {
        let origin_x = left + i as i64 * cell;
        if origin_x >= width {
            break;
        }
        if origin_x + cell <= 0 {
            continue;
        }
        for (row, bits) in glyph(c).into_iter().enumerate() {
            for col in 0..8i64 {
                if (bits >> col) & 1 == 0 {
                    continue;
                }
                let px = origin_x + col * i64::from(scale);
                let py = top + row as i64 * i64::from(scale);
                // The glyph cell overlaps the image, so these fit in i32.
                let (Ok(px), Ok(py)) = (i32::try_from(px), i32::try_from(py)) else {
                    continue;
                };
                draw_filled_rect_mut(image, Rect::at(px, py).of_size(scale, scale), color);
            }
        }
    }
}
