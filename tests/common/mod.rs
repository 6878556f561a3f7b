#![allow(dead_code)]

use std::fs;
use std::path::Path;

use image::{Rgb, RgbImage};

pub const GRAY: Rgb<u8> = Rgb([128, 128, 128]);

pub fn write_jpg(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    RgbImage::from_pixel(width, height, GRAY)
        .save(path)
        .expect("write jpg file");
}

pub fn write_json(path: &Path, json: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, json).expect("write json file");
}

/// True if any pixel within `radius` of `(x, y)` is clearly green.
///
/// JPEG output is lossy, so exact color checks are not possible on files.
pub fn green_near(image: &RgbImage, x: u32, y: u32, radius: u32) -> bool {
    let x0 = x.saturating_sub(radius);
    let y0 = y.saturating_sub(radius);
    let x1 = (x + radius).min(image.width() - 1);
    let y1 = (y + radius).min(image.height() - 1);

    (y0..=y1).any(|py| {
        (x0..=x1).any(|px| {
            let Rgb([r, g, b]) = *image.get_pixel(px, py);
            g > 180 && r < 90 && b < 90
        })
    })
}

/// True if any pixel in the rectangle `[x0, x1] x [y0, y1]` is clearly blue.
pub fn blue_in(image: &RgbImage, (x0, y0): (u32, u32), (x1, y1): (u32, u32)) -> bool {
    (y0..=y1.min(image.height() - 1)).any(|py| {
        (x0..=x1.min(image.width() - 1)).any(|px| {
            let Rgb([r, g, b]) = *image.get_pixel(px, py);
            b > 160 && r < 110 && g < 110
        })
    })
}

pub fn close_to(actual: Rgb<u8>, expected: Rgb<u8>, tolerance: u8) -> bool {
    actual
        .0
        .iter()
        .zip(expected.0)
        .all(|(a, e)| a.abs_diff(e) <= tolerance)
}
