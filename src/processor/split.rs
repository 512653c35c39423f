//! Composite file splitting on disk.
//!
//! `X.txt` is split into the sibling artifacts `X.anthro.csv` and
//! `X.lmk.csv`; the batch splitter does this for every discovered scan.

use super::{FileDiscovery, finish_progress, new_progress_bar, print_summary};
use crate::config::SplitterConfig;
use crate::constants::{ANTHRO_SUFFIX, LANDMARK_SUFFIX, SPLIT_EXTENSION};
use crate::error::Result;
use crate::models::{ProcessingStats, SplitOutputs};
use crate::parser::split;

use colored::*;
use futures::stream::{self, StreamExt};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::task;
use tracing::{debug, error};

/// Path of a split artifact next to its source scan
pub fn artifact_path(scan_path: &Path, suffix: &str) -> PathBuf {
    let stem = scan_path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();
    scan_path.with_file_name(format!("{}.{}.{}", stem, suffix, SPLIT_EXTENSION))
}

/// Split one composite file and write its anthro and landmark artifacts
pub fn split_file(scan_path: &Path) -> Result<SplitOutputs> {
    split_file_inner(scan_path).map_err(|e| e.in_file(scan_path))
}

fn split_file_inner(scan_path: &Path) -> Result<SplitOutputs> {
    let source = fs::read_to_string(scan_path)?;
    let composite = split(source.lines())?;

    let anthro_path = artifact_path(scan_path, ANTHRO_SUFFIX);
    let landmark_path = artifact_path(scan_path, LANDMARK_SUFFIX);

    write_rows(&anthro_path, &composite.anthro)?;
    write_rows(&landmark_path, &composite.landmark)?;

    debug!(
        "Split {} into {} anthro and {} landmark rows",
        scan_path.display(),
        composite.anthro.len(),
        composite.landmark.len()
    );

    Ok(SplitOutputs {
        anthro_path,
        landmark_path,
        anthro_rows: composite.anthro.len(),
        landmark_rows: composite.landmark.len(),
    })
}

fn write_rows(path: &Path, rows: &[String]) -> Result<()> {
    let mut text = rows.join("\n");
    if !text.is_empty() {
        text.push('\n');
    }
    fs::write(path, text)?;
    Ok(())
}

/// Splits every composite scan discovered in a directory
#[derive(Debug)]
pub struct BatchSplitter {
    discovery: FileDiscovery,
    config: SplitterConfig,
}

impl BatchSplitter {
    /// Create a batch splitter over a scan directory
    pub fn new(scan_dir: impl Into<PathBuf>, config: SplitterConfig) -> Result<Self> {
        config.validate()?;
        let discovery = FileDiscovery::new(scan_dir, &config.split_pattern, config.recurse)?;
        Ok(Self { discovery, config })
    }

    /// Split all scans; per-file failures are collected, not fatal
    pub async fn run(&self) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        println!("{}", "Splitting composite scans".bright_green().bold());
        println!(
            "  {} {}",
            "Directory:".bright_cyan(),
            self.discovery.root().display()
        );

        let files = self.discovery.discover()?;
        println!(
            "  {} {} scan files",
            "Found".bright_green(),
            files.len().to_string().bright_white().bold()
        );

        let pb = new_progress_bar(files.len(), "Splitting...", self.config.show_progress);
        let results = stream::iter(files)
            .map(|path| {
                let pb = pb.clone();
                async move {
                    let task_path = path.clone();
                    let result = task::spawn_blocking(move || split_file(&task_path)).await;
                    pb.inc(1);
                    (path, result)
                }
            })
            .buffer_unordered(self.config.workers)
            .collect::<Vec<_>>()
            .await;
        finish_progress(&pb, "Splitting complete");

        let mut stats = ProcessingStats::default();
        for (path, result) in results {
            match result {
                Ok(Ok(outputs)) => {
                    stats.files_processed += 1;
                    stats.total_rows += outputs.anthro_rows + outputs.landmark_rows;
                }
                Ok(Err(e)) if e.is_per_file() => {
                    error!("{}", e);
                    stats.record_failure(path, e.to_string());
                }
                Ok(Err(e)) => return Err(e),
                Err(join_error) => {
                    error!("Split task for {} failed: {}", path.display(), join_error);
                    stats.record_failure(path, format!("task failed: {}", join_error));
                }
            }
        }
        stats.failures.sort_by(|a, b| a.path.cmp(&b.path));
        stats.processing_time_ms = start_time.elapsed().as_millis();

        print_summary("Split Summary", &stats);
        Ok(stats)
    }
}
