use anyhow::{Context, Result};
use clap::Parser;
use pixel_rects::Offset;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod batch;
mod report;

use batch::{run_batch, BatchConfig};

/// Convert a folder of PNG images into rect-based SVG documents
#[derive(Debug, Parser)]
#[command(name = "png-batch", version)]
struct Args {
    /// Folder containing the source PNG files
    #[arg(short, long, env = "PNG_BATCH_INPUT", default_value = "png")]
    input: PathBuf,

    /// Folder receiving the SVG files, created if missing
    #[arg(short, long, env = "PNG_BATCH_OUTPUT", default_value = "svg")]
    output: PathBuf,

    /// Output name prefix; files are named "<prefix> <n>.svg"
    #[arg(long, env = "PNG_BATCH_PREFIX", default_value = "yoyo")]
    prefix: String,

    /// Horizontal shift applied to every rect
    #[arg(long, env = "PNG_BATCH_DX", default_value_t = 0, allow_hyphen_values = true)]
    dx: i64,

    /// Vertical shift applied to every rect
    #[arg(long, env = "PNG_BATCH_DY", default_value_t = 0, allow_hyphen_values = true)]
    dy: i64,

    /// Stop at the first file that fails to convert
    #[arg(long, env = "PNG_BATCH_FAIL_FAST")]
    fail_fast: bool,

    /// Write the batch report as JSON to this path
    #[arg(long, env = "PNG_BATCH_REPORT")]
    report: Option<PathBuf>,
}

impl Args {
    fn config(&self) -> BatchConfig {
        BatchConfig {
            input_dir: self.input.clone(),
            output_dir: self.output.clone(),
            prefix: self.prefix.clone(),
            offset: Offset::new(self.dx, self.dy),
            fail_fast: self.fail_fast,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = args.config();
    info!("Batch config: {}", serde_json::to_string(&config)?);

    let report = run_batch(&config)?;
    report.print_summary();

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!("Saved batch report to {}", path.display());
    }

    Ok(())
}
