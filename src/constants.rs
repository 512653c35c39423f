//! Application constants for the scan splitter
//!
//! Markers and tokens of the composite export format, output naming
//! conventions and CLI defaults.

// =============================================================================
// Composite Export Format
// =============================================================================

/// Lines starting with this character are section headers
pub const HEADER_MARKER: char = '#';

/// Data lines containing this character are comments and are discarded
pub const COMMENT_MARKER: char = '*';

/// Validity flag tokens that may lead off a data line (1 = valid, 0 = invalid)
pub const VALIDITY_FLAGS: &[&str] = &["1  ", "0  "];

/// Coordinates expected on every landmark row
pub const LANDMARK_COORDINATES: usize = 3;

// =============================================================================
// Output Format
// =============================================================================

/// Field delimiter for split rows and aggregate tables
pub const FIELD_DELIMITER: char = ',';

/// Stem suffix of the anthro measurement artifact
pub const ANTHRO_SUFFIX: &str = "anthro";

/// Stem suffix of the landmark artifact
pub const LANDMARK_SUFFIX: &str = "lmk";

/// Extension written for split artifacts
pub const SPLIT_EXTENSION: &str = "csv";

/// Identifier column of the aggregate table
pub const ID_COLUMN: &str = "id";

/// Location column of the aggregate table
pub const LOCATION_COLUMN: &str = "location";

/// Default file name of the aggregate table, relative to the anthro directory
pub const DEFAULT_AGGREGATE_STEM: &str = "aggregate_anthro";

// =============================================================================
// CLI Defaults
// =============================================================================

/// Default glob pattern for composite scan files
pub const DEFAULT_SPLIT_PATTERN: &str = "*_composite.txt";

/// Default glob pattern for split anthro files
pub const DEFAULT_AGGREGATE_PATTERN: &str = "*_composite.anthro.csv";

/// Default compression for Parquet output
pub const DEFAULT_COMPRESSION: &str = "snappy";
