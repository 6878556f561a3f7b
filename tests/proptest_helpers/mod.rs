#![allow(dead_code)]

use image::{Rgb, RgbImage};
use labelviz::annotation::Vertex;
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub const BASE: Rgb<u8> = Rgb([40, 80, 120]);

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Coordinates near a small image half the time, anywhere in `i32` otherwise.
pub fn arb_coord() -> impl Strategy<Value = i32> {
    prop_oneof![-100i32..200, any::<i32>()]
}

pub fn arb_vertex() -> impl Strategy<Value = Vertex> {
    (arb_coord(), arb_coord()).prop_map(|(x, y)| Vertex::new(x, y))
}

/// Inclusive bounding box of `points`, grown by `margin` on every side.
pub fn bounds(points: &[Vertex], margin: i64) -> (i64, i64, i64, i64) {
    let xs = points.iter().map(|v| i64::from(v.x));
    let ys = points.iter().map(|v| i64::from(v.y));
    (
        xs.clone().min().unwrap_or(0) - margin,
        ys.clone().min().unwrap_or(0) - margin,
        xs.max().unwrap_or(0) + margin,
        ys.max().unwrap_or(0) + margin,
    )
}

/// First pixel outside `(x0, y0, x1, y1)` that differs from [`BASE`].
pub fn changed_outside(image: &RgbImage, (x0, y0, x1, y1): (i64, i64, i64, i64)) -> Option<(u32, u32)> {
    image.enumerate_pixels().find_map(|(x, y, p)| {
        let (px, py) = (i64::from(x), i64::from(y));
        let inside = px >= x0 && px <= x1 && py >= y0 && py <= y1;
        (!inside && *p != BASE).then_some((x, y))
    })
}
