//! Directory batch driver.
//!
//! Pairs every `<stem>.json` in the input directory with `<stem>.jpg`,
//! renders the annotations onto the image and writes `<stem>.jpg` to the
//! output directory. Files are handled one at a time in file-name order;
//! a problem with one pair is recorded in the [`BatchReport`] and the batch
//! moves on.

mod report;

pub use report::{BatchReport, ProcessedFile, SkipReason, SkippedFile};

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{ImageReader, RgbImage};
use walkdir::WalkDir;

use crate::annotation::{parse_document, Document, FormatMode};
use crate::error::VizError;
use crate::render::{RenderStyle, Renderer, TextRenderer};

/// Extension of annotation files (matched case-insensitively).
pub const ANNOTATION_EXTENSION: &str = "json";

/// Extension of the paired input image and of the written output.
pub const IMAGE_EXTENSION: &str = "jpg";

/// Options for a batch run.
#[derive(Clone, Debug)]
pub struct BatchOptions {
    /// Directory holding `<stem>.json` / `<stem>.jpg` pairs.
    pub input_dir: PathBuf,
    /// Directory receiving annotated `<stem>.jpg` files; created if absent.
    pub output_dir: PathBuf,
    /// Annotation layout to expect.
    pub mode: FormatMode,
    /// Colors, strokes and text sizes.
    pub style: RenderStyle,
    /// Optional TrueType/OpenType font for labels.
    pub font: Option<PathBuf>,
}

impl BatchOptions {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            mode: FormatMode::default(),
            style: RenderStyle::default(),
            font: None,
        }
    }

    pub fn with_mode(mut self, mode: FormatMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_font(mut self, font: impl Into<PathBuf>) -> Self {
        self.font = Some(font.into());
        self
    }

    fn output_path(&self, annotation: &Path) -> PathBuf {
        let mut name = annotation.file_stem().unwrap_or_default().to_os_string();
        name.push(".");
        name.push(IMAGE_EXTENSION);
        self.output_dir.join(name)
    }
}

/// Render every annotation/image pair in the input directory.
///
/// One diagnostic line per file is written to `log` as the batch progresses.
///
/// # Errors
/// Fails only when the batch cannot run at all: the output directory cannot
/// be created, the input directory cannot be listed, the font cannot be
/// loaded, or `log` cannot be written. Per-file problems are reported in the
/// returned [`BatchReport`].
pub fn run_batch<W: Write>(opts: &BatchOptions, log: &mut W) -> Result<BatchReport, VizError> {
    fs::create_dir_all(&opts.output_dir).map_err(|source| VizError::OutputDir {
        path: opts.output_dir.clone(),
        source,
    })?;

    let text = match &opts.font {
        Some(path) => TextRenderer::from_font_file(path)?,
        None => TextRenderer::Bitmap,
    };
    let renderer = Renderer::new(opts.style.clone(), text);

    let mut report = BatchReport::new(opts.mode, false);
    for annotation in collect_annotation_files(&opts.input_dir)? {
        match render_pair(opts, &renderer, &annotation) {
            Ok(processed) => {
                writeln!(log, "{}", processed)?;
                report.processed.push(processed);
            }
            Err(reason) => {
                let skipped = SkippedFile { annotation, reason };
                writeln!(log, "{}", skipped)?;
                report.skipped.push(skipped);
            }
        }
    }

    Ok(report)
}

/// Pair and parse every annotation file without decoding or writing images.
///
/// Reports what [`run_batch`] would render; the output directory is not
/// touched.
pub fn check_batch<W: Write>(opts: &BatchOptions, log: &mut W) -> Result<BatchReport, VizError> {
    let mut report = BatchReport::new(opts.mode, true);

    for annotation in collect_annotation_files(&opts.input_dir)? {
        let checked = paired_image(&annotation)
            .and_then(|_| load_document(&annotation, opts.mode))
            .map(|doc| ProcessedFile {
                output: opts.output_path(&annotation),
                annotation: annotation.clone(),
                records_drawn: doc.records.len(),
                records_ignored: doc.ignored,
                dry_run: true,
            });

        match checked {
            Ok(processed) => {
                writeln!(log, "{}", processed)?;
                report.processed.push(processed);
            }
            Err(reason) => {
                let skipped = SkippedFile { annotation, reason };
                writeln!(log, "{}", skipped)?;
                report.skipped.push(skipped);
            }
        }
    }

    Ok(report)
}

#[tracing::instrument(skip_all, fields(file = %annotation.display()))]
fn render_pair(
    opts: &BatchOptions,
    renderer: &Renderer,
    annotation: &Path,
) -> Result<ProcessedFile, SkipReason> {
    let image_path = paired_image(annotation)?;
    let doc = load_document(annotation, opts.mode)?;
    let mut image = decode_image(&image_path)?;

    renderer.render(&mut image, &doc);

    let output = opts.output_path(annotation);
    write_jpeg(&image, &output, renderer.style().jpeg_quality)?;
    tracing::info!(
        output = %output.display(),
        records = doc.records.len(),
        ignored = doc.ignored,
        "rendered annotations"
    );

    Ok(ProcessedFile {
        annotation: annotation.to_path_buf(),
        output,
        records_drawn: doc.records.len(),
        records_ignored: doc.ignored,
        dry_run: false,
    })
}

/// Annotation files directly inside `dir`, sorted by file name.
fn collect_annotation_files(dir: &Path) -> Result<Vec<PathBuf>, VizError> {
    let mut files = Vec::new();

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();
    for entry in walker {
        let entry = entry.map_err(|source| VizError::InputDir {
            path: dir.to_path_buf(),
            source,
        })?;

        if entry.file_type().is_file() && has_extension(entry.path(), ANNOTATION_EXTENSION) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
}

fn paired_image(annotation: &Path) -> Result<PathBuf, SkipReason> {
    let image = annotation.with_extension(IMAGE_EXTENSION);
    if image.is_file() {
        Ok(image)
    } else {
        Err(SkipReason::MissingImage { image })
    }
}

fn load_document(annotation: &Path, mode: FormatMode) -> Result<Document, SkipReason> {
    let bytes = fs::read(annotation).map_err(|e| SkipReason::UnreadableAnnotation {
        message: e.to_string(),
    })?;
    let value: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|e| SkipReason::InvalidJson {
            message: e.to_string(),
        })?;

    parse_document(&value, mode).map_err(|e| SkipReason::UnknownFormat {
        message: e.to_string(),
    })
}

fn decode_image(path: &Path) -> Result<RgbImage, SkipReason> {
    let decode_err = |message: String| SkipReason::ImageDecode {
        image: path.to_path_buf(),
        message,
    };

    let reader = ImageReader::open(path)
        .map_err(|e| decode_err(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| decode_err(e.to_string()))?;
    let image = reader.decode().map_err(|e| decode_err(e.to_string()))?;

    Ok(image.to_rgb8())
}

fn write_jpeg(image: &RgbImage, output: &Path, quality: u8) -> Result<(), SkipReason> {
    let write_err = |message: String| SkipReason::ImageWrite {
        output: output.to_path_buf(),
        message,
    };

    let file = File::create(output).map_err(|e| write_err(e.to_string()))?;
    let mut writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(&mut writer, quality);
    image
        .write_with_encoder(encoder)
        .map_err(|e| write_err(e.to_string()))?;
    writer.flush().map_err(|e| write_err(e.to_string()))
}
