//! Composite scan export parsing.
//!
//! Turns the raw text of a composite export into delimited anthro and
//! landmark rows, and derives subject identifiers and canonical measurement
//! names from the labels and reference tables that accompany a batch.
//! Everything here works on in-memory text; file handling lives in
//! [`crate::processor`].

pub mod composite;
pub mod line;
pub mod names;
pub mod subject;

pub use composite::split;
pub use line::{normalize_line, row_to_delimited, split_row};
pub use names::extract_measurement_names;
pub use subject::extract_subject_id;
