//! Fuzz target for annotation document parsing.
//!
//! Feeds arbitrary bytes to the parser in both modes, checking for panics,
//! crashes, or hangs.

#![no_main]

use labelviz::annotation::{parse_document_slice, FormatMode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = parse_document_slice(data, FormatMode::Mixed);
    let _ = parse_document_slice(data, FormatMode::PolygonOnly);
});
