//! vocaug: bounding-box aware augmentation for Pascal VOC datasets.
//!
//! vocaug reads images with their Pascal VOC XML annotations, runs them
//! through a randomized transform pipeline that moves the boxes together with
//! the pixels, and writes new image/XML pairs. Boxes that no longer fit the
//! transformed image are dropped together with their labels.
//!
//! # Modules
//!
//! - [`ir`]: Box and annotation types, VOC XML and CSV codecs
//! - [`validation`]: Bounds checks for boxes against image dimensions
//! - [`pipeline`]: Transform steps, the pipeline executor and its config
//! - [`augment`]: Batch augmentation over a directory of images
//! - [`viewer`]: Annotation overlays for manual inspection
//! - [`error`]: Error types for vocaug operations

pub mod augment;
pub mod error;
pub mod ir;
pub mod pipeline;
pub mod validation;
pub mod viewer;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

pub use error::VocAugError;

/// The vocaug CLI application.
#[derive(Parser)]
#[command(name = "vocaug")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG
    /// takes precedence when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Write augmented image/XML pairs for every image in a directory.
    Augment(AugmentArgs),
    /// Append the boxes of every VOC XML in a directory to a flat CSV.
    Csv(CsvArgs),
    /// Draw annotations onto copies of the images in a directory.
    View(ViewArgs),
    /// Check every VOC XML in a directory against its image bounds.
    Validate(ValidateArgs),
}

/// Arguments for the augment subcommand.
#[derive(clap::Args)]
struct AugmentArgs {
    /// Directory of images (with paired .xml files), or a single image.
    source: PathBuf,

    /// Output directory [default: <SOURCE>/augmentations].
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Augmented examples to produce per source image.
    #[arg(short = 'n', long, env = "VOCAUG_COUNT", default_value_t = augment::DEFAULT_COUNT)]
    count: usize,

    /// Base seed for reproducible runs.
    #[arg(long, env = "VOCAUG_SEED")]
    seed: Option<u64>,

    /// Load the pipeline from a .json/.yaml config instead of the default.
    #[arg(long, value_name = "PATH")]
    load_pipeline: Option<PathBuf>,

    /// Save the pipeline config used for this run.
    #[arg(long, value_name = "PATH")]
    save_pipeline: Option<PathBuf>,

    /// Summary format ('text' or 'json').
    #[arg(long, default_value = "text")]
    report: String,
}

/// Arguments for the csv subcommand.
#[derive(clap::Args)]
struct CsvArgs {
    /// Directory containing the VOC XML files.
    dir: PathBuf,

    /// CSV file to append to [default: <DIR>/training.csv].
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Extension substituted for `.xml` to form each row's image path.
    #[arg(long, default_value = "jpg")]
    image_ext: String,
}

/// Arguments for the view subcommand.
#[derive(clap::Args)]
struct ViewArgs {
    /// Directory containing images and their VOC XML files.
    dir: PathBuf,

    /// Directory for the overlay images [default: <DIR>/overlays].
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TrueType/OpenType font for labels; boxes only when omitted.
    #[arg(long, env = "VOCAUG_FONT")]
    font: Option<PathBuf>,
}

/// Arguments for the validate subcommand.
#[derive(clap::Args)]
struct ValidateArgs {
    /// Directory containing the VOC XML files.
    dir: PathBuf,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,
}

/// Run the vocaug CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), VocAugError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Augment(args)) => run_augment(args),
        Some(Commands::Csv(args)) => run_csv(args),
        Some(Commands::View(args)) => run_view(args),
        Some(Commands::Validate(args)) => run_validate(args),
        None => {
            println!("vocaug {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Bounding-box aware augmentation for Pascal VOC datasets.");
            println!();
            println!("Run 'vocaug --help' for usage information.");
            Ok(())
        }
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Execute the augment subcommand.
fn run_augment(args: AugmentArgs) -> Result<(), VocAugError> {
    let config = match &args.load_pipeline {
        Some(path) => {
            let config = pipeline::read_pipeline_config(path)?;
            info!(path = %path.display(), "loaded pipeline config");
            config
        }
        None => pipeline::PipelineConfig::default(),
    };

    if let Some(path) = &args.save_pipeline {
        pipeline::write_pipeline_config(path, &config)?;
        info!(path = %path.display(), "saved pipeline config");
    }

    let options = augment::AugmentOptions {
        source: args.source,
        output_dir: args.output,
        count: args.count,
        seed: args.seed,
        config,
    };
    let report = augment::augment_dir(&options)?;

    match args.report.as_str() {
        "json" => {
            let json =
                serde_json::to_string_pretty(&report).map_err(|e| VocAugError::InvalidInput {
                    message: format!("failed to render report: {e}"),
                })?;
            println!("{json}");
        }
        _ => print!("{}", report),
    }

    if report.all_failed() {
        return Err(VocAugError::BatchFailed {
            attempted: report.attempted,
        });
    }
    Ok(())
}

/// Execute the csv subcommand.
fn run_csv(args: CsvArgs) -> Result<(), VocAugError> {
    let csv_path = args
        .output
        .unwrap_or_else(|| args.dir.join(ir::io_csv::DEFAULT_CSV_FILE_NAME));
    let exported = ir::io_csv::export_dir_csv(&args.dir, &csv_path, &args.image_ext)?;
    println!(
        "Exported {} annotation file(s) to {}",
        exported,
        csv_path.display()
    );
    Ok(())
}

/// Execute the view subcommand.
fn run_view(args: ViewArgs) -> Result<(), VocAugError> {
    let font = args.font.as_deref().map(viewer::load_font).transpose()?;
    let out_dir = args
        .output
        .unwrap_or_else(|| args.dir.join(viewer::DEFAULT_OVERLAY_DIR_NAME));

    let written = viewer::render_dir(
        &args.dir,
        &out_dir,
        &viewer::DrawStyle::default(),
        font.as_ref(),
    )?;
    println!("Wrote {} overlay(s) to {}", written, out_dir.display());
    Ok(())
}

/// Execute the validate subcommand.
fn run_validate(args: ValidateArgs) -> Result<(), VocAugError> {
    let mut error_count = 0;
    let mut warning_count = 0;

    for entry in WalkDir::new(&args.dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| VocAugError::SourceTraversal {
            path: args.dir.clone(),
            message: source.to_string(),
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("xml")
        {
            continue;
        }

        println!("{}:", path.display());
        match validation::validate_voc_file(path) {
            Ok(report) => {
                error_count += report.error_count();
                warning_count += report.warning_count();
                print!("{}", report);
            }
            Err(err) => {
                error_count += 1;
                println!("  error: {err}");
            }
        }
    }

    if error_count > 0 || (args.strict && warning_count > 0) {
        Err(VocAugError::ValidationFailed {
            error_count,
            warning_count,
        })
    } else {
        Ok(())
    }
}
