use pixel_rects::VectorizeStats;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Result of converting a single PNG
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub source: PathBuf,
    pub output: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<VectorizeStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileOutcome {
    pub fn converted(source: &Path, output: &Path, stats: VectorizeStats) -> Self {
        Self {
            source: source.to_path_buf(),
            output: output.to_path_buf(),
            stats: Some(stats),
            error: None,
        }
    }

    pub fn failed(source: &Path, output: &Path, error: String) -> Self {
        Self {
            source: source.to_path_buf(),
            output: output.to_path_buf(),
            stats: None,
            error: Some(error),
        }
    }

    pub fn success(&self) -> bool {
        self.error.is_none()
    }
}

/// Summary of a batch run
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub entries: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn record(&mut self, outcome: FileOutcome) {
        self.total += 1;
        if outcome.success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.entries.push(outcome);
    }

    /// Rects emitted across all converted files
    pub fn emitted_rects(&self) -> usize {
        self.entries
            .iter()
            .filter_map(|e| e.stats.as_ref())
            .map(|s| s.emitted_rects)
            .sum()
    }

    /// Ratio of emitted rects to opaque source pixels, 1.0 when nothing was converted
    pub fn compression_ratio(&self) -> f64 {
        let pixels: usize = self
            .entries
            .iter()
            .filter_map(|e| e.stats.as_ref())
            .map(|s| s.opaque_pixels)
            .sum();

        if pixels == 0 {
            1.0
        } else {
            self.emitted_rects() as f64 / pixels as f64
        }
    }

    pub fn print_summary(&self) {
        println!("==========================================");
        println!("PNG -> SVG batch report");
        println!("==========================================\n");

        println!("Total: {}", self.total);
        println!("Converted: {}", self.succeeded);
        println!("Failed: {}", self.failed);
        println!(
            "Rects emitted: {} ({:.1}% of opaque pixels)",
            self.emitted_rects(),
            self.compression_ratio() * 100.0
        );

        println!("\n{:<30} {:<10} {:<10} {}", "File", "Status", "Rects", "Error");
        println!("{}", "-".repeat(70));

        for entry in &self.entries {
            let name = entry
                .source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let status = if entry.success() { "OK" } else { "FAIL" };
            let rects = entry
                .stats
                .as_ref()
                .map(|s| s.emitted_rects.to_string())
                .unwrap_or_else(|| "-".to_string());
            let error = entry.error.as_deref().unwrap_or("");
            println!("{:<30} {:<10} {:<10} {}", name, status, rects, error);
        }
    }
}
