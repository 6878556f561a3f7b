//! Outline stroking and translucent polygon fill.

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::{draw_polygon_mut, BresenhamLineIter};
use imageproc::point::Point;

use crate::annotation::Vertex;

const MASK_ON: Luma<u8> = Luma([255]);

/// Margin around the image that the fill polygon is clipped to. Vertices
/// within it pass through unchanged.
const FILL_PAD: f64 = 4096.0;

/// Stroke the closed contour through `points` with a square pen.
///
/// The pen covers `thickness` pixels and is placed so that each vertex pixel
/// itself is painted. A single point is drawn as a dot, two points as a line.
pub fn draw_closed_outline(image: &mut RgbImage, points: &[Vertex], color: Rgb<u8>, thickness: u32) {
    let Some(&first) = points.first() else {
        return;
    };
    if points.len() == 1 {
        stamp(image, first.x, first.y, color, thickness);
        return;
    }

    let closing = std::iter::once((points[points.len() - 1], first));
    for (a, b) in points.windows(2).map(|w| (w[0], w[1])).chain(closing) {
        draw_thick_segment(image, a, b, color, thickness);
    }
}

/// Blend `color` over the interior of the polygon.
///
/// Each covered pixel becomes `alpha * color + (1 - alpha) * original`.
/// Pixels outside the polygon are left untouched. Polygons with fewer than
/// three distinct vertices enclose nothing and are skipped.
pub fn shade_polygon(image: &mut RgbImage, points: &[Vertex], color: Rgb<u8>, alpha: f32) {
    let bounds = (
        -FILL_PAD,
        -FILL_PAD,
        f64::from(image.width()) + FILL_PAD,
        f64::from(image.height()) + FILL_PAD,
    );
    let poly = fill_contour(&clip_polygon(points, bounds));
    if poly.len() < 3 || alpha <= 0.0 {
        return;
    }

    let mut mask = GrayImage::new(image.width(), image.height());
    draw_polygon_mut(&mut mask, &poly, MASK_ON);

    let alpha = f64::from(alpha.min(1.0));
    for (px, m) in image.pixels_mut().zip(mask.pixels()) {
        if *m != MASK_ON {
            continue;
        }
        for (dst, src) in px.0.iter_mut().zip(color.0) {
            let blended = alpha * f64::from(src) + (1.0 - alpha) * f64::from(*dst);
            *dst = blended.round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Vertices prepared for scanline filling: a repeated closing vertex is
/// dropped, since the contour is closed implicitly.
fn fill_contour(points: &[(f64, f64)]) -> Vec<Point<i32>> {
    let mut poly: Vec<Point<i32>> = points
        .iter()
        .map(|&(x, y)| Point::new(x.round() as i32, y.round() as i32))
        .collect();
    poly.dedup();
    while poly.len() > 1 && poly.first() == poly.last() {
        poly.pop();
    }
    poly
}

/// Sutherland-Hodgman clip of the closed polygon `points` against
/// `(x_min, y_min, x_max, y_max)`.
fn clip_polygon(points: &[Vertex], (x_min, y_min, x_max, y_max): (f64, f64, f64, f64)) -> Vec<(f64, f64)> {
    let mut poly: Vec<(f64, f64)> = points
        .iter()
        .map(|v| (f64::from(v.x), f64::from(v.y)))
        .collect();

    // (axis, limit, keep values >= limit)
    let planes = [(0, x_min, true), (0, x_max, false), (1, y_min, true), (1, y_max, false)];
    for (axis, limit, keep_above) in planes {
        let coord = |p: (f64, f64)| if axis == 0 { p.0 } else { p.1 };
        let inside = |p: (f64, f64)| {
            if keep_above {
                coord(p) >= limit
            } else {
                coord(p) <= limit
            }
        };
        let crossing = |a: (f64, f64), b: (f64, f64)| {
            let t = (limit - coord(a)) / (coord(b) - coord(a));
            (a.0 + t * (b.0 - a.0), a.1 + t * (b.1 - a.1))
        };

        let input = std::mem::take(&mut poly);
        let Some(&last) = input.last() else {
            break;
        };
        let mut prev = last;
        for &cur in &input {
            match (inside(prev), inside(cur)) {
                (true, true) => poly.push(cur),
                (true, false) => poly.push(crossing(prev, cur)),
                (false, true) => {
                    poly.push(crossing(prev, cur));
                    poly.push(cur);
                }
                (false, false) => {}
            }
            prev = cur;
        }
    }
    poly
}

fn draw_thick_segment(image: &mut RgbImage, a: Vertex, b: Vertex, color: Rgb<u8>, thickness: u32) {
    let pad = f64::from(thickness);
    let bounds = (
        -pad,
        -pad,
        f64::from(image.width()) + pad,
        f64::from(image.height()) + pad,
    );
    let Some((start, end)) = clip_segment(a, b, bounds) else {
        return;
    };

    for (x, y) in BresenhamLineIter::new(start, end) {
        stamp(image, x, y, color, thickness);
    }
}

/// Paint a `thickness` x `thickness` square covering `(x, y)`.
fn stamp(image: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, thickness: u32) {
    let t = i64::from(thickness.max(1));
    let left = i64::from(x) - t / 2;
    let top = i64::from(y) - t / 2;

    let x_range = left.max(0)..(left + t).min(i64::from(image.width()));
    let y_range = top.max(0)..(top + t).min(i64::from(image.height()));
    for py in y_range {
        for px in x_range.clone() {
            image.put_pixel(px as u32, py as u32, color);
        }
    }
}

/// Liang-Barsky clip of segment `a`-`b` against `(x_min, y_min, x_max, y_max)`.
///
/// Keeps huge off-image coordinates from walking millions of pixels.
fn clip_segment(
    a: Vertex,
    b: Vertex,
    (x_min, y_min, x_max, y_max): (f64, f64, f64, f64),
) -> Option<((f32, f32), (f32, f32))> {
    let (x0, y0) = (f64::from(a.x), f64::from(a.y));
    let (dx, dy) = (f64::from(b.x) - x0, f64::from(b.y) - y0);

    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;
    for (p, q) in [
        (-dx, x0 - x_min),
        (dx, x_max - x0),
        (-dy, y0 - y_min),
        (dy, y_max - y0),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }

    let at = |t: f64| ((x0 + t * dx).round() as f32, (y0 + t * dy).round() as f32);
    Some((at(t0), at(t1)))
}
