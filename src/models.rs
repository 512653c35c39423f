//! Core data structures shared by the parser, aggregator and batch runner.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Identifier of one scanned subject/session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectId {
    pub id: String,
    pub location: String,
}

impl SubjectId {
    pub fn new(id: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            location: location.into(),
        }
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.location.is_empty() {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{}/{}", self.location, self.id)
        }
    }
}

/// Delimited rows produced by splitting one composite file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitComposite {
    /// Core measurements followed by custom measurements
    pub anthro: Vec<String>,
    /// Landmark coordinates
    pub landmark: Vec<String>,
}

/// Paths written for one split composite file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOutputs {
    pub anthro_path: PathBuf,
    pub landmark_path: PathBuf,
    pub anthro_rows: usize,
    pub landmark_rows: usize,
}

/// A file that could not be processed, with the reason
#[derive(Debug, Clone)]
pub struct FileFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Processing statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub files_processed: usize,
    pub files_failed: usize,
    pub total_rows: usize,
    pub output_path: Option<PathBuf>,
    pub failures: Vec<FileFailure>,
    pub processing_time_ms: u128,
}

impl ProcessingStats {
    /// Record a file that failed without aborting the run
    pub fn record_failure(&mut self, path: PathBuf, reason: impl Into<String>) {
        self.files_failed += 1;
        self.failures.push(FileFailure {
            path,
            reason: reason.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_display() {
        assert_eq!(SubjectId::new("001", "CPEN").to_string(), "CPEN/001");
        assert_eq!(SubjectId::new("1234 (2)", "").to_string(), "1234 (2)");
    }

    #[test]
    fn test_record_failure() {
        let mut stats = ProcessingStats::default();
        stats.record_failure(PathBuf::from("a.txt"), "bad");
        stats.record_failure(PathBuf::from("b.txt"), "worse");

        assert_eq!(stats.files_failed, 2);
        assert_eq!(stats.failures[1].path, PathBuf::from("b.txt"));
        assert_eq!(stats.failures[0].reason, "bad");
    }
}
