//! Scan Splitter Library
//!
//! Splits composite anthropometric scan exports into per-subject anthro
//! measurement and landmark tables, and aggregates many subjects into one
//! wide table keyed by measurement name.
//!
//! This library provides tools for:
//! - Segmenting a composite export into its core, custom and landmark sections
//! - Normalizing raw data lines into delimited rows
//! - Extracting subject identifiers and location codes from file labels
//! - Reading canonical measurement names from a reference table
//! - Aggregating subject tables with blank-filled missing measurements
//! - Batch splitting and aggregation of scan directories with CSV/Parquet output

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod parser;
pub mod processor;

pub use aggregate::{AggregateTable, SubjectTable, aggregate};
pub use config::SplitterConfig;
pub use error::{Result, SplitterError};
pub use models::{SplitComposite, SubjectId};
pub use parser::{
    extract_measurement_names, extract_subject_id, normalize_line, row_to_delimited, split,
};
