//! Error handling for scan splitting and aggregation.
//!
//! Provides error types with context for malformed composite files,
//! subject identifier extraction, aggregation conflicts and the I/O
//! performed by the batch runner.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Malformed data line {line_number}: {reason}")]
    MalformedLine { line_number: usize, reason: String },

    #[error("Malformed composite file: expected 3 data sections, found {chunks}")]
    MalformedComposite { chunks: usize },

    #[error("No subject identifier found in label: '{label}'")]
    NoSubjectId { label: String },

    #[error("Duplicate subject: id '{id}' at location '{location}' appears more than once")]
    DuplicateSubject { id: String, location: String },

    #[error("Processing failed for file: {path} - {source}")]
    FileFailed {
        path: PathBuf,
        #[source]
        source: Box<SplitterError>,
    },

    #[error("Input not found at path: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Invalid file pattern: {0}")]
    InvalidPattern(#[from] glob::PatternError),

    #[error("Directory traversal failed: {0}")]
    DirectoryTraversal(#[from] walkdir::Error),

    #[error("No subject tables to aggregate in: {path}")]
    NoSubjects { path: PathBuf },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl SplitterError {
    /// Attach the offending file to an error raised while processing it
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            already @ SplitterError::FileFailed { .. } => already,
            other => SplitterError::FileFailed {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }

    /// Errors that abort a single file but never the surrounding batch
    pub fn is_per_file(&self) -> bool {
        match self {
            SplitterError::MalformedLine { .. }
            | SplitterError::MalformedComposite { .. }
            | SplitterError::NoSubjectId { .. }
            | SplitterError::Io(_) => true,
            SplitterError::FileFailed { source, .. } => source.is_per_file(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SplitterError>;
