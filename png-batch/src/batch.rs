use anyhow::{Context, Result};
use pixel_rects::{vectorize_file, Offset};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::report::{BatchReport, FileOutcome};

/// Settings for one batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub prefix: String,
    pub offset: Offset,
    /// Abort on the first failing file instead of recording it and moving on
    pub fail_fast: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("png"),
            output_dir: PathBuf::from("svg"),
            prefix: "yoyo".to_string(),
            offset: Offset::default(),
            fail_fast: false,
        }
    }
}

impl BatchConfig {
    /// Output path for the `n`th converted file (1-based)
    pub fn output_path(&self, n: usize) -> PathBuf {
        self.output_dir.join(format!("{} {}.svg", self.prefix, n))
    }
}

/// List PNG files in `dir`, sorted by file name
pub fn find_png_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read input folder {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_png(path))
        .collect();

    files.sort();
    Ok(files)
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("png"))
        .unwrap_or(false)
}

/// Convert every PNG in the input folder into a numbered SVG in the output folder.
///
/// Each document is built in memory and written only once conversion succeeds.
/// Failing files are recorded in the report unless `fail_fast` is set, in which
/// case the first failure is returned.
pub fn run_batch(config: &BatchConfig) -> Result<BatchReport> {
    let files = find_png_files(&config.input_dir)?;

    if !config.output_dir.exists() {
        fs::create_dir_all(&config.output_dir).with_context(|| {
            format!(
                "Failed to create output folder {}",
                config.output_dir.display()
            )
        })?;
        info!("Created output folder {}", config.output_dir.display());
    }

    info!(
        "Converting {} PNG files from {} to {}",
        files.len(),
        config.input_dir.display(),
        config.output_dir.display()
    );

    let mut report = BatchReport::default();

    for (i, source) in files.iter().enumerate() {
        let output = config.output_path(i + 1);

        match convert_one(source, &output, config.offset) {
            Ok(stats) => {
                info!(
                    "{} -> {} ({} rects)",
                    source.display(),
                    output.display(),
                    stats.emitted_rects
                );
                report.record(FileOutcome::converted(source, &output, stats));
            }
            Err(e) if config.fail_fast => {
                return Err(e.context(format!("Failed to convert {}", source.display())));
            }
            Err(e) => {
                warn!("Skipping {}: {:#}", source.display(), e);
                report.record(FileOutcome::failed(source, &output, format!("{:#}", e)));
            }
        }
    }

    Ok(report)
}

fn convert_one(
    source: &Path,
    output: &Path,
    offset: Offset,
) -> Result<pixel_rects::VectorizeStats> {
    let vectorized = vectorize_file(source, offset)
        .with_context(|| format!("Failed to vectorize {}", source.display()))?;

    fs::write(output, &vectorized.svg)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    Ok(vectorized.stats)
}
