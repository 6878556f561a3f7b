//! Fuzz target for rendering parsed documents.
//!
//! Any document that parses must render onto a small image without
//! panicking, whatever its coordinates or labels.

#![no_main]

use image::RgbImage;
use labelviz::annotation::{parse_document_slice, FormatMode};
use labelviz::render::render_document;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 64 * 1024 {
        return;
    }

    if let Ok(doc) = parse_document_slice(data, FormatMode::Mixed) {
        let mut image = RgbImage::new(32, 32);
        render_document(&mut image, &doc);
    }
});
