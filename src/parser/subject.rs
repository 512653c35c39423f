//! Subject identifier extraction from filename-derived labels.
//!
//! Labels look like `CPEN1234 (2) 2021-04-20_18-00-00_composite`: an
//! optional alphabetic location code, the numeric subject id (optionally
//! followed by a `(n)` or `-n` repeat marker), then date/time fragments
//! that are ignored.

use crate::error::{Result, SplitterError};
use crate::models::SubjectId;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// `<ALPHA*><DIGITS>[ (DIGITS) | -DIGITS]` terminated by whitespace or end of label
static SUBJECT_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]*)([0-9]+(?: ?\([0-9]+\)|-[0-9]+)?)(?:\s|$)")
        .expect("subject id pattern is valid")
});

/// Extract the subject id and location code from a label.
///
/// An empty location code is replaced by `default_location`. Labels that do
/// not open with an identifier fail rather than guess.
pub fn extract_subject_id(label: &str, default_location: &str) -> Result<SubjectId> {
    let captures = SUBJECT_ID
        .captures(label.trim_start())
        .ok_or_else(|| SplitterError::NoSubjectId {
            label: label.to_string(),
        })?;

    let location = match &captures[1] {
        "" => default_location,
        code => code,
    };
    let subject = SubjectId::new(&captures[2], location);

    debug!("Extracted subject {} from '{}'", subject, label);
    Ok(subject)
}
