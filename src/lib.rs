//! labelviz: draw annotation overlays onto images.
//!
//! labelviz reads per-image JSON annotation files, draws the rectangles and
//! polygons they describe (with their labels) onto the matching images, and
//! writes the annotated images to an output directory.
//!
//! # Modules
//!
//! - [`annotation`]: Annotation model and JSON parsing
//! - [`render`]: Drawing documents onto image buffers
//! - [`batch`]: Directory-level driver and run reports
//! - [`error`]: Error types for labelviz operations

pub mod annotation;
pub mod batch;
pub mod error;
pub mod render;

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use error::{DocumentError, VizError};

use annotation::FormatMode;
use batch::{BatchOptions, BatchReport};
use render::RenderStyle;

/// The labelviz CLI application.
#[derive(Parser)]
#[command(name = "labelviz")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Draw annotations onto their images and write the results.
    Render(RenderArgs),
    /// Pair and parse annotation files without writing anything.
    Check(CheckArgs),
}

/// Arguments for the render subcommand.
#[derive(clap::Args)]
struct RenderArgs {
    /// Directory containing `<name>.json` / `<name>.jpg` pairs.
    #[arg(long, env = "LABELVIZ_INPUT", default_value = "input")]
    input: PathBuf,

    /// Directory to write annotated images to (created if absent).
    #[arg(long, env = "LABELVIZ_OUTPUT_DIR", default_value = "output")]
    output_dir: PathBuf,

    /// Annotation layout ('mixed' or 'polygon').
    #[arg(long, default_value = "mixed")]
    mode: String,

    /// YAML file overriding colors, stroke width and text sizes.
    #[arg(long)]
    style: Option<PathBuf>,

    /// TrueType/OpenType font for labels (default: built-in bitmap font).
    #[arg(long)]
    font: Option<PathBuf>,

    /// Exit non-zero if any annotation file was skipped.
    #[arg(long)]
    strict: bool,

    /// Output format for the summary ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the check subcommand.
#[derive(clap::Args)]
struct CheckArgs {
    /// Directory containing `<name>.json` / `<name>.jpg` pairs.
    #[arg(long, env = "LABELVIZ_INPUT", default_value = "input")]
    input: PathBuf,

    /// Directory the annotated images would be written to.
    #[arg(long, env = "LABELVIZ_OUTPUT_DIR", default_value = "output")]
    output_dir: PathBuf,

    /// Annotation layout ('mixed' or 'polygon').
    #[arg(long, default_value = "mixed")]
    mode: String,

    /// Exit non-zero if any annotation file would be skipped.
    #[arg(long)]
    strict: bool,

    /// Output format for the summary ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Run the labelviz CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), VizError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Render(args)) => run_render(args),
        Some(Commands::Check(args)) => run_check(args),
        None => {
            println!("labelviz {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Draw annotation overlays onto images.");
            println!();
            println!("Run 'labelviz --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the render subcommand.
fn run_render(args: RenderArgs) -> Result<(), VizError> {
    let mode: FormatMode = args.mode.parse()?;
    let summary = SummaryFormat::parse(&args.output)?;
    let style = match &args.style {
        Some(path) => RenderStyle::from_yaml_file(path)?,
        None => RenderStyle::default(),
    };

    let mut opts = BatchOptions::new(args.input, args.output_dir)
        .with_mode(mode)
        .with_style(style);
    opts.font = args.font;

    // Keep stdout clean for the JSON summary.
    let report = match summary {
        SummaryFormat::Text => batch::run_batch(&opts, &mut io::stdout().lock())?,
        SummaryFormat::Json => batch::run_batch(&opts, &mut io::stderr().lock())?,
    };
    finish(report, summary, args.strict)
}

/// Execute the check subcommand.
fn run_check(args: CheckArgs) -> Result<(), VizError> {
    let mode: FormatMode = args.mode.parse()?;
    let summary = SummaryFormat::parse(&args.output)?;

    // Check never writes, so the output directory only shapes the report.
    let opts = BatchOptions::new(args.input, args.output_dir).with_mode(mode);

    let report = match summary {
        SummaryFormat::Text => batch::check_batch(&opts, &mut io::stdout().lock())?,
        SummaryFormat::Json => batch::check_batch(&opts, &mut io::stderr().lock())?,
    };
    finish(report, summary, args.strict)
}

#[derive(Clone, Copy)]
enum SummaryFormat {
    Text,
    Json,
}

impl SummaryFormat {
    fn parse(s: &str) -> Result<Self, VizError> {
        match s {
            "text" => Ok(SummaryFormat::Text),
            "json" => Ok(SummaryFormat::Json),
            other => Err(VizError::UnsupportedFormat(format!(
                "'{}' (supported: text, json)",
                other
            ))),
        }
    }
}

fn finish(report: BatchReport, summary: SummaryFormat, strict: bool) -> Result<(), VizError> {
    match summary {
        SummaryFormat::Json => {
            let json = serde_json::to_string_pretty(&report).map_err(io::Error::from)?;
            println!("{}", json);
        }
        SummaryFormat::Text => {
            println!();
            print!("{}", report);
        }
    }

    if strict && !report.is_complete() {
        Err(VizError::BatchIncomplete {
            skipped: report.skipped.len(),
            total: report.total(),
            report,
        })
    } else {
        Ok(())
    }
}
