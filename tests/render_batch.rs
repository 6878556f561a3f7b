//! End-to-end batch rendering tests.

use std::fs;
use std::path::Path;

use labelviz::annotation::FormatMode;
use labelviz::batch::{run_batch, BatchOptions, SkipReason};
use labelviz::render::RenderStyle;

mod common;
use common::{blue_in, close_to, green_near, write_jpg, write_json, GRAY};

fn load(path: &Path) -> image::RgbImage {
    image::open(path).expect("open output image").to_rgb8()
}

#[test]
fn rectangle_with_label_end_to_end() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let input = temp.path().join("input");
    let output = temp.path().join("output");

    write_json(
        &input.join("a.json"),
        r#"[{"x":10,"y":10,"w":20,"h":20,"labelType":"Car"}]"#,
    );
    write_jpg(&input.join("a.jpg"), 100, 100);

    let mut log = Vec::new();
    let report = run_batch(&BatchOptions::new(&input, &output), &mut log).expect("run batch");

    assert_eq!(report.processed.len(), 1);
    assert!(report.skipped.is_empty());
    assert_eq!(report.records_drawn(), 1);

    let out_path = output.join("a.jpg");
    assert!(out_path.is_file());
    let image = load(&out_path);
    assert_eq!(image.dimensions(), (100, 100));

    assert!(green_near(&image, 10, 10, 1), "top-left corner");
    assert!(green_near(&image, 30, 30, 1), "bottom-right corner");
    // y = 10 is near the top, so the label baseline sits at y + 20 = 30.
    assert!(blue_in(&image, (10, 14), (60, 30)), "label text near (10, 30)");

    let log = String::from_utf8(log).unwrap();
    assert!(log.contains("Saved visualization:"));
    assert!(log.contains("a.jpg"));
}

#[test]
fn output_directory_is_created() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let input = temp.path().join("input");
    let output = temp.path().join("nested/deeper/output");

    write_json(&input.join("a.json"), "[]");
    write_jpg(&input.join("a.jpg"), 8, 8);

    run_batch(&BatchOptions::new(&input, &output), &mut Vec::new()).expect("run batch");
    assert!(output.join("a.jpg").is_file());
}

#[test]
fn skipped_files_do_not_halt_the_batch() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let input = temp.path().join("input");
    let output = temp.path().join("output");

    // Sorted order: a (no image), b (bad shape), c (bad json), d (good).
    write_json(&input.join("a.json"), "[]");
    write_json(&input.join("b.json"), "42");
    write_jpg(&input.join("b.jpg"), 8, 8);
    write_json(&input.join("c.json"), "{oops");
    write_jpg(&input.join("c.jpg"), 8, 8);
    write_json(&input.join("d.json"), r#"{"x":1,"y":1,"w":4,"h":4}"#);
    write_jpg(&input.join("d.jpg"), 8, 8);
    fs::write(input.join("readme.txt"), "ignored").unwrap();

    let mut log = Vec::new();
    let report = run_batch(&BatchOptions::new(&input, &output), &mut log).expect("run batch");

    assert_eq!(report.total(), 4);
    assert_eq!(report.processed.len(), 1);
    assert!(matches!(
        report.skipped[0].reason,
        SkipReason::MissingImage { .. }
    ));
    assert!(matches!(
        report.skipped[1].reason,
        SkipReason::UnknownFormat { .. }
    ));
    assert!(matches!(
        report.skipped[2].reason,
        SkipReason::InvalidJson { .. }
    ));

    let written: Vec<_> = fs::read_dir(&output)
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(written, vec!["d.jpg"]);

    let log = String::from_utf8(log).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "Image not found for a.json");
    assert!(lines[1].starts_with("Unknown JSON format in b.json"));
    assert!(lines[3].starts_with("Saved visualization:"));
}

#[test]
fn polygon_mode_rejects_lone_object_without_points() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let input = temp.path().join("input");
    let output = temp.path().join("output");

    write_json(&input.join("a.json"), r#"{"x":1,"y":1,"w":4,"h":4}"#);
    write_jpg(&input.join("a.jpg"), 8, 8);

    let mixed = run_batch(&BatchOptions::new(&input, &output), &mut Vec::new()).expect("mixed");
    assert_eq!(mixed.processed.len(), 1);

    let opts = BatchOptions::new(&input, &output).with_mode(FormatMode::PolygonOnly);
    let polygon = run_batch(&opts, &mut Vec::new()).expect("polygon");
    assert_eq!(polygon.processed.len(), 0);
    assert_eq!(
        polygon.skipped[0].reason,
        SkipReason::UnknownFormat {
            message: "single-object document has no `points` field".into()
        }
    );
}

#[test]
fn polygon_is_shaded_in_output() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let input = temp.path().join("input");
    let output = temp.path().join("output");

    write_json(
        &input.join("p.json"),
        r#"{"points": [[20,20],[80,20],[80,80],[20,80]], "type": {"cls": "Road"}}"#,
    );
    write_jpg(&input.join("p.jpg"), 100, 100);

    let opts = BatchOptions::new(&input, &output).with_mode(FormatMode::PolygonOnly);
    let report = run_batch(&opts, &mut Vec::new()).expect("run batch");
    assert_eq!(report.records_drawn(), 1);

    let image = load(&output.join("p.jpg"));
    // 0.3 * (0,255,0) + 0.7 * (128,128,128) = (90, 166, 90)
    assert!(close_to(*image.get_pixel(30, 70), image::Rgb([90, 166, 90]), 24));
    assert!(close_to(*image.get_pixel(5, 5), GRAY, 24));
    assert!(green_near(&image, 80, 20, 1));
    assert!(blue_in(&image, (26, 38), (74, 62)), "label around centroid (50, 50)");
}

#[test]
fn empty_points_leave_image_unchanged() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let input = temp.path().join("input");
    let output = temp.path().join("output");

    write_json(&input.join("e.json"), r#"[{"points": [], "labelType": "Car"}]"#);
    write_jpg(&input.join("e.jpg"), 16, 16);

    let report = run_batch(&BatchOptions::new(&input, &output), &mut Vec::new()).expect("run");
    assert_eq!(report.records_drawn(), 0);
    assert_eq!(report.records_ignored(), 1);

    let image = load(&output.join("e.jpg"));
    assert!(image.pixels().all(|p| close_to(*p, GRAY, 8)));
}

#[test]
fn custom_style_is_applied() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let input = temp.path().join("input");
    let output = temp.path().join("output");

    write_json(&input.join("a.json"), r#"[{"x":10,"y":10,"w":20,"h":20}]"#);
    write_jpg(&input.join("a.jpg"), 50, 50);

    let style = RenderStyle {
        outline_color: [255, 0, 0],
        outline_thickness: 4,
        ..Default::default()
    };
    let opts = BatchOptions::new(&input, &output).with_style(style);
    run_batch(&opts, &mut Vec::new()).expect("run batch");

    let image = load(&output.join("a.jpg"));
    let image::Rgb([r, g, b]) = *image.get_pixel(10, 20);
    assert!(r > 180 && g < 90 && b < 90, "red outline, got ({r}, {g}, {b})");
}

#[test]
fn missing_font_is_fatal() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let input = temp.path().join("input");
    fs::create_dir_all(&input).unwrap();

    let opts = BatchOptions::new(&input, temp.path().join("output"))
        .with_font(temp.path().join("missing.ttf"));
    let err = run_batch(&opts, &mut Vec::new()).unwrap_err();
    assert!(matches!(err, labelviz::VizError::FontLoad { .. }));
}
