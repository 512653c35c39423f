//! Aggregation run over a directory of split anthro files.
//!
//! Each anthro file contributes one subject, identified from its file
//! name. The canonical measurement names come from a reference table when
//! one is supplied, otherwise from the union of names across subjects.

use super::writer::TableWriter;
use super::{FileDiscovery, finish_progress, new_progress_bar, print_summary};
use crate::aggregate::{SubjectTable, aggregate, union_of_names};
use crate::config::SplitterConfig;
use crate::constants::DEFAULT_AGGREGATE_STEM;
use crate::error::{Result, SplitterError};
use crate::models::ProcessingStats;
use crate::parser::{extract_measurement_names, extract_subject_id};

use colored::*;
use futures::stream::{self, StreamExt};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::task;
use tracing::{debug, error, info};

/// Read one split anthro file as a subject table, labelled by its file name
pub fn read_subject_table(anthro_path: &Path, default_location: &str) -> Result<SubjectTable> {
    let label = anthro_path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy();

    let subject =
        extract_subject_id(&label, default_location).map_err(|e| e.in_file(anthro_path))?;
    let text = fs::read_to_string(anthro_path)
        .map_err(|e| SplitterError::from(e).in_file(anthro_path))?;

    Ok(SubjectTable::from_delimited_rows(subject, text.lines()))
}

/// Read the canonical measurement names from a reference table
pub fn read_measurement_names(names_path: &Path) -> Result<Vec<String>> {
    let text =
        fs::read_to_string(names_path).map_err(|e| SplitterError::from(e).in_file(names_path))?;
    Ok(extract_measurement_names(&text))
}

/// Aggregates the anthro files of a directory into one table
#[derive(Debug)]
pub struct Aggregation {
    discovery: FileDiscovery,
    names_path: Option<PathBuf>,
    output_path: PathBuf,
    config: SplitterConfig,
}

impl Aggregation {
    /// Create an aggregation run over an anthro directory
    ///
    /// Without an explicit output path the table is written into the
    /// anthro directory as `aggregate_anthro.<csv|parquet>`.
    pub fn new(
        anthro_dir: impl Into<PathBuf>,
        names_path: Option<PathBuf>,
        output_path: Option<PathBuf>,
        config: SplitterConfig,
    ) -> Result<Self> {
        config.validate()?;
        let anthro_dir = anthro_dir.into();
        let output_path = output_path.unwrap_or_else(|| {
            anthro_dir.join(format!(
                "{}.{}",
                DEFAULT_AGGREGATE_STEM,
                config.output_format.extension()
            ))
        });
        let discovery = FileDiscovery::new(anthro_dir, &config.aggregate_pattern, config.recurse)?;

        Ok(Self {
            discovery,
            names_path,
            output_path,
            config,
        })
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Run the aggregation
    ///
    /// Files without a subject identifier are skipped and reported; a
    /// duplicate subject aborts the run before anything is written.
    pub async fn run(&self) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        println!("{}", "Aggregating anthro measurements".bright_green().bold());
        println!(
            "  {} {}",
            "Directory:".bright_cyan(),
            self.discovery.root().display()
        );
        println!("  {} {}", "Output:".bright_cyan(), self.output_path.display());

        let reference_names = match &self.names_path {
            Some(path) => {
                let names = read_measurement_names(path)?;
                info!("Loaded {} canonical names from {}", names.len(), path.display());
                Some(names)
            }
            None => None,
        };

        let files = self.discovery.discover()?;
        println!(
            "  {} {} anthro files",
            "Found".bright_green(),
            files.len().to_string().bright_white().bold()
        );

        let pb = new_progress_bar(files.len(), "Reading...", self.config.show_progress);
        let results = stream::iter(files)
            .map(|path| {
                let pb = pb.clone();
                let default_location = self.config.default_location.clone();
                async move {
                    let task_path = path.clone();
                    let result = task::spawn_blocking(move || {
                        read_subject_table(&task_path, &default_location)
                    })
                    .await;
                    pb.inc(1);
                    (path, result)
                }
            })
            .buffered(self.config.workers)
            .collect::<Vec<_>>()
            .await;
        finish_progress(&pb, "Reading complete");

        let mut stats = ProcessingStats::default();
        let mut tables = Vec::with_capacity(results.len());
        for (path, result) in results {
            match result {
                Ok(Ok(table)) => tables.push(table),
                Ok(Err(e)) if e.is_per_file() => {
                    error!("{}", e);
                    stats.record_failure(path, e.to_string());
                }
                Ok(Err(e)) => return Err(e),
                Err(join_error) => {
                    error!("Read task for {} failed: {}", path.display(), join_error);
                    stats.record_failure(path, format!("task failed: {}", join_error));
                }
            }
        }

        if tables.is_empty() {
            return Err(SplitterError::NoSubjects {
                path: self.discovery.root().to_path_buf(),
            });
        }

        let names = reference_names.unwrap_or_else(|| {
            debug!("No reference names given, using the union of subject measurements");
            union_of_names(&tables)
        });

        let table = aggregate(&tables, &names)?;
        stats.files_processed = table.len();
        stats.total_rows = table.len();

        TableWriter::new(
            self.output_path.clone(),
            self.config.output_format,
            self.config.compression_algorithm,
        )
        .write(&table)?;

        stats.output_path = Some(self.output_path.clone());
        stats.processing_time_ms = start_time.elapsed().as_millis();

        print_summary("Aggregation Summary", &stats);
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SubjectId;
    use tempfile::TempDir;

    #[test]
    fn test_read_subject_table() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir
            .path()
            .join("CPEN1234 (2) 2021-04-20_18-00-00_composite.anthro.csv");
        fs::write(&path, "Actual Weight,1.2\nChest,3.4\n").unwrap();

        let table = read_subject_table(&path, "FOO").unwrap();

        assert_eq!(table.subject(), &SubjectId::new("1234 (2)", "CPEN"));
        assert_eq!(table.get("Chest"), Some("3.4"));
    }

    #[test]
    fn test_read_subject_table_without_id() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir
            .path()
            .join("2021-04-20_18-00-00_composite.anthro.csv");
        fs::write(&path, "Actual Weight,1.2\n").unwrap();

        let err = read_subject_table(&path, "").unwrap_err();
        assert!(err.is_per_file());
        match err {
            SplitterError::FileFailed { source, .. } => {
                assert!(matches!(*source, SplitterError::NoSubjectId { .. }));
            }
            other => panic!("Expected FileFailed error, got {other:?}"),
        }
    }

    #[test]
    fn test_default_output_path() {
        let config = SplitterConfig {
            output_format: crate::config::OutputFormat::Parquet,
            ..Default::default()
        };
        let aggregation = Aggregation::new("/scans", None, None, config).unwrap();

        assert_eq!(
            aggregation.output_path(),
            Path::new("/scans/aggregate_anthro.parquet")
        );
    }
}
