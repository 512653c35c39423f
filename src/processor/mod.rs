//! Batch processing of scan directories.
//!
//! Orchestrates the file-level workflow around the in-memory parser:
//! discovering scans, splitting them concurrently into anthro and landmark
//! artifacts, and aggregating split anthro files into one table.

pub mod aggregation;
pub mod discovery;
pub mod split;
pub mod writer;

#[cfg(test)]
pub mod tests;

pub use self::aggregation::Aggregation;
pub use self::discovery::FileDiscovery;
pub use self::split::{BatchSplitter, split_file};
pub use self::writer::TableWriter;

use crate::models::ProcessingStats;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar over a known number of files; hidden when progress is off
pub(crate) fn new_progress_bar(len: usize, message: &'static str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.set_message(message);
    pb
}

pub(crate) fn finish_progress(pb: &ProgressBar, message: &'static str) {
    pb.finish_with_message(message);
}

/// Print the end-of-run summary, listing every failed file
pub(crate) fn print_summary(title: &str, stats: &ProcessingStats) {
    println!("\n{}", title.bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Files processed:".bright_cyan(),
        stats.files_processed.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Total rows:".bright_cyan(),
        stats.total_rows.to_string().bright_white().bold()
    );
    if let Some(output_path) = &stats.output_path {
        println!("  {} {}", "Output:".bright_cyan(), output_path.display());
    }
    if stats.files_failed > 0 {
        println!(
            "  {} {}",
            "Files failed:".bright_red(),
            stats.files_failed.to_string().bright_red().bold()
        );
        for failure in &stats.failures {
            println!(
                "    {} {}",
                failure.path.display().to_string().bright_red(),
                failure.reason
            );
        }
    }
}
