//! Batch report types.
//!
//! A [`BatchReport`] records what happened to every annotation file in a run:
//! which outputs were written and which files were skipped and why. It
//! renders as the human-readable summary and serializes to JSON.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::annotation::FormatMode;

/// The result of rendering (or checking) one input directory.
#[derive(Clone, Debug, Default, Serialize)]
pub struct BatchReport {
    /// Annotation layout the batch was run with.
    pub mode: FormatMode,
    /// True for `check` runs, where nothing is decoded or written.
    pub dry_run: bool,
    /// Annotation files that produced (or would produce) an output image.
    pub processed: Vec<ProcessedFile>,
    /// Annotation files that were skipped.
    pub skipped: Vec<SkippedFile>,
}

impl BatchReport {
    pub fn new(mode: FormatMode, dry_run: bool) -> Self {
        Self {
            mode,
            dry_run,
            ..Default::default()
        }
    }

    /// Total number of annotation files seen.
    pub fn total(&self) -> usize {
        self.processed.len() + self.skipped.len()
    }

    /// Records drawn across all processed files.
    pub fn records_drawn(&self) -> usize {
        self.processed.iter().map(|p| p.records_drawn).sum()
    }

    /// Entries dropped as unrecognized across all processed files.
    pub fn records_ignored(&self) -> usize {
        self.processed.iter().map(|p| p.records_ignored).sum()
    }

    /// Returns true if no file was skipped.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.dry_run { "renderable" } else { "rendered" };
        writeln!(
            f,
            "  {} annotation file(s) [{}]: {} {}, {} skipped",
            self.total(),
            self.mode,
            self.processed.len(),
            verb,
            self.skipped.len()
        )?;
        writeln!(
            f,
            "  records: {} drawn, {} ignored",
            self.records_drawn(),
            self.records_ignored()
        )?;
        Ok(())
    }
}

/// An annotation file that was rendered.
#[derive(Clone, Debug, Serialize)]
pub struct ProcessedFile {
    pub annotation: PathBuf,
    pub output: PathBuf,
    pub records_drawn: usize,
    pub records_ignored: usize,
    #[serde(skip)]
    pub dry_run: bool,
}

impl fmt::Display for ProcessedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dry_run {
            write!(
                f,
                "OK {}: {} record(s) would be drawn to {}",
                file_name(&self.annotation),
                self.records_drawn,
                self.output.display()
            )
        } else {
            write!(f, "Saved visualization: {}", self.output.display())
        }
    }
}

/// An annotation file that was skipped, with the reason.
#[derive(Clone, Debug, Serialize)]
pub struct SkippedFile {
    pub annotation: PathBuf,
    pub reason: SkipReason,
}

impl fmt::Display for SkippedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = file_name(&self.annotation);
        match &self.reason {
            SkipReason::MissingImage { .. } => write!(f, "Image not found for {}", name),
            SkipReason::UnknownFormat { message } => {
                write!(f, "Unknown JSON format in {} ({})", name, message)
            }
            SkipReason::UnreadableAnnotation { message } => {
                write!(f, "Could not read {}: {}", name, message)
            }
            SkipReason::InvalidJson { message } => {
                write!(f, "Invalid JSON in {}: {}", name, message)
            }
            SkipReason::ImageDecode { image, message } => {
                write!(f, "Could not decode {}: {}", file_name(image), message)
            }
            SkipReason::ImageWrite { output, message } => {
                write!(f, "Could not write {}: {}", output.display(), message)
            }
        }
    }
}

/// Why an annotation file did not produce an output image.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// No same-stem `.jpg` next to the annotation file.
    MissingImage { image: PathBuf },
    /// The annotation file could not be read.
    UnreadableAnnotation { message: String },
    /// The annotation file is not valid JSON.
    InvalidJson { message: String },
    /// The JSON has a top-level shape the mode does not accept.
    UnknownFormat { message: String },
    /// The paired image could not be decoded.
    ImageDecode { image: PathBuf, message: String },
    /// The annotated image could not be written.
    ImageWrite { output: PathBuf, message: String },
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
