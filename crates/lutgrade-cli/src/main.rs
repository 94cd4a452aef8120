//! lutgrade - LUT color grading CLI
//!
//! Applies .cube / .3dl looks to photos, single or in batch.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use lutgrade_engine::{DitherType, ProcessorPreference};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "lutgrade")]
#[command(author, version, about = "LUT color grading for photos")]
#[command(long_about = "
Applies 3D LUT looks (.cube, .3dl) to photos.

Examples:
  lutgrade grade photo.jpg -l look.cube               # -> photo-look.jpg
  lutgrade grade photo.png -l look.cube -o out.png
  lutgrade grade photo.jpg -l a.cube --lut2 b.cube --lut2-strength 0.4
  lutgrade grade photo.jpg -l look.cube -s 0.7 -q 95 --dither ordered
  lutgrade batch 'shots/*.jpg' -l look.cube -o graded/
  lutgrade info look.cube
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade a single photo through a LUT
    #[command(visible_alias = "g")]
    Grade(GradeArgs),

    /// Grade every photo matching a glob pattern
    #[command(visible_alias = "b")]
    Batch(BatchArgs),

    /// Describe a LUT file
    #[command(visible_alias = "i")]
    Info(InfoArgs),
}

/// Dither mode for the 8-bit re-quantization step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum DitherArg {
    /// Plain round-to-nearest.
    #[default]
    None,
    /// 4x4 Bayer pattern, deterministic.
    Ordered,
    /// Per-task seeded noise.
    Random,
}

impl From<DitherArg> for DitherType {
    fn from(d: DitherArg) -> Self {
        match d {
            DitherArg::None => DitherType::None,
            DitherArg::Ordered => DitherType::Ordered,
            DitherArg::Random => DitherType::Random,
        }
    }
}

/// Processor backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum ProcessorArg {
    /// Accelerated when available, CPU otherwise.
    #[default]
    Auto,
    /// Force the CPU path.
    Cpu,
    /// Prefer the accelerated path.
    Accelerated,
}

impl From<ProcessorArg> for ProcessorPreference {
    fn from(p: ProcessorArg) -> Self {
        match p {
            ProcessorArg::Auto => ProcessorPreference::Auto,
            ProcessorArg::Cpu => ProcessorPreference::Cpu,
            ProcessorArg::Accelerated => ProcessorPreference::Accelerated,
        }
    }
}

/// Grading parameters shared by `grade` and `batch`.
#[derive(Args)]
struct LookArgs {
    /// Primary LUT file (.cube or .3dl)
    #[arg(short = 'l', long = "lut", required = true)]
    lut: PathBuf,

    /// Secondary LUT file, blended after the primary
    #[arg(long)]
    lut2: Option<PathBuf>,

    /// Primary LUT strength, 0.0 - 1.0
    #[arg(short, long, default_value = "1.0")]
    strength: f32,

    /// Secondary LUT strength, 0.0 - 1.0
    #[arg(long, default_value = "1.0")]
    lut2_strength: f32,

    /// JPEG quality, 1 - 100
    #[arg(short, long, default_value = "90")]
    quality: u8,

    /// Dither mode for re-quantization
    #[arg(short, long, value_enum, default_value_t = DitherArg::None)]
    dither: DitherArg,

    /// Processor backend
    #[arg(short, long, value_enum, default_value_t = ProcessorArg::Auto)]
    processor: ProcessorArg,
}

#[derive(Args)]
struct GradeArgs {
    /// Input photo (.png, .jpg)
    input: PathBuf,

    #[command(flatten)]
    look: LookArgs,

    /// Output path (default: <input-stem>-<lut-stem>.jpg next to input)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct BatchArgs {
    /// Input glob pattern, e.g. 'shots/*.jpg'
    pattern: String,

    #[command(flatten)]
    look: LookArgs,

    /// Output directory
    #[arg(short, long, default_value = "graded")]
    output_dir: PathBuf,
}

#[derive(Args)]
struct InfoArgs {
    /// LUT file(s) to describe
    #[arg(required = true)]
    luts: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with_writer(std::io::stderr)
        .init();

    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Grade(args) => commands::grade::run(args, cli.verbose),
        Commands::Batch(args) => commands::batch::run(args, cli.verbose),
        Commands::Info(args) => commands::info::run(args),
    }
}
