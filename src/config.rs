//! Configuration management and validation.
//!
//! Provides the processing settings shared by the split and aggregation
//! runners, and the output format options for the aggregate table.

use crate::constants::{DEFAULT_AGGREGATE_PATTERN, DEFAULT_SPLIT_PATTERN};
use crate::error::{Result, SplitterError};
use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported compression algorithms for parquet files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    Snappy,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// No compression
    Uncompressed,
}

impl CompressionAlgorithm {
    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(&self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Uncompressed => ParquetCompression::Uncompressed,
        }
    }
}

impl FromStr for CompressionAlgorithm {
    type Err = SplitterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "snappy" => Ok(CompressionAlgorithm::Snappy),
            "zstd" => Ok(CompressionAlgorithm::Zstd),
            "lz4" => Ok(CompressionAlgorithm::Lz4),
            "none" | "uncompressed" => Ok(CompressionAlgorithm::Uncompressed),
            other => Err(SplitterError::Configuration {
                message: format!(
                    "Unknown compression '{}' (expected snappy, zstd, lz4 or none)",
                    other
                ),
            }),
        }
    }
}

/// File format of the aggregate table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum OutputFormat {
    Csv,
    Parquet,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Parquet => "parquet",
        }
    }
}

/// Global configuration for scan splitting and aggregation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitterConfig {
    /// Number of files processed concurrently
    pub workers: usize,

    /// Glob pattern selecting composite scan files
    pub split_pattern: String,

    /// Glob pattern selecting split anthro files for aggregation
    pub aggregate_pattern: String,

    /// Search subdirectories as well
    pub recurse: bool,

    /// Location code for subjects whose label carries none
    pub default_location: String,

    /// Aggregate table format
    pub output_format: OutputFormat,

    /// Parquet compression for the aggregate table
    pub compression_algorithm: CompressionAlgorithm,

    /// Draw progress bars
    pub show_progress: bool,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
            split_pattern: DEFAULT_SPLIT_PATTERN.to_string(),
            aggregate_pattern: DEFAULT_AGGREGATE_PATTERN.to_string(),
            recurse: false,
            default_location: String::new(),
            output_format: OutputFormat::Csv,
            compression_algorithm: CompressionAlgorithm::Snappy,
            show_progress: true,
        }
    }
}

impl SplitterConfig {
    /// Check settings before any file is touched
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(SplitterError::Configuration {
                message: "workers must be at least 1".to_string(),
            });
        }

        for (label, pattern) in [
            ("split pattern", &self.split_pattern),
            ("aggregate pattern", &self.aggregate_pattern),
        ] {
            if pattern.trim().is_empty() {
                return Err(SplitterError::Configuration {
                    message: format!("{} must not be empty", label),
                });
            }
            glob::Pattern::new(pattern)?;
        }

        Ok(())
    }
}
