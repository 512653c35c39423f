//! Data line normalization.
//!
//! Raw data lines look like `1  Actual Weight: 1.2` or
//! `1  AbdomenBack<TAB>5.6<TAB>7.8<TAB>-9.10`. Normalizing strips the
//! validity flag, swaps tabs for spaces and drops the colon after a label,
//! giving `Actual Weight 1.2`. Delimiting then separates the name from its
//! trailing numeric values: `Actual Weight,1.2`.

use crate::constants::{COMMENT_MARKER, FIELD_DELIMITER, VALIDITY_FLAGS};
use crate::error::{Result, SplitterError};

/// Normalize one raw data line.
///
/// Comment lines (containing `*`) are returned with only the validity flag
/// removed so callers can recognise and discard them.
pub fn normalize_line(line: &str) -> Result<String> {
    normalize_numbered(line, 1)
}

/// Normalize a line, reporting failures against its position in the source
pub(crate) fn normalize_numbered(line: &str, line_number: usize) -> Result<String> {
    let line = strip_validity_flag(line);

    if line.trim().is_empty() {
        return Err(SplitterError::MalformedLine {
            line_number,
            reason: "line is empty after removing the validity flag".to_string(),
        });
    }

    if line.contains(COMMENT_MARKER) {
        return Ok(line.to_string());
    }

    let line = line.replace('\t', " ");
    Ok(remove_label_colon(&line).trim_end().to_string())
}

/// Remove a single leading validity flag, if present
pub fn strip_validity_flag(line: &str) -> &str {
    VALIDITY_FLAGS
        .iter()
        .find_map(|flag| line.strip_prefix(flag))
        .unwrap_or(line)
}

/// Drop the colon that ends a label ("Name: value" -> "Name value").
///
/// The label ends where the trailing numeric values begin, so colons inside
/// the name are kept and only those closing it are removed.
fn remove_label_colon(line: &str) -> String {
    let start = line.len() - line.trim_start().len();
    let end = start + name_len(&line[start..]);
    let name = line[start..end].trim_end_matches(|c: char| c == ':' || c.is_whitespace());

    let mut out = String::with_capacity(line.len());
    out.push_str(&line[..start]);
    out.push_str(name);
    out.push_str(&line[end..]);
    out
}

/// Length of the name at the front of a row, before any trailing numeric tokens
fn name_len(row: &str) -> usize {
    let mut end = row.trim_end().len();

    while let Some((idx, c)) = row[..end].char_indices().rev().find(|(_, c)| c.is_whitespace()) {
        if !is_numeric(&row[idx + c.len_utf8()..end]) {
            break;
        }
        end = row[..idx].trim_end().len();
    }

    end
}

/// Split a normalized row into its name and trailing numeric values.
///
/// The first token always belongs to the name; the name keeps its internal
/// spacing exactly as written.
pub fn split_row(row: &str) -> (&str, Vec<&str>) {
    let row = row.trim();
    let (name, values) = row.split_at(name_len(row));
    (name, values.split_whitespace().collect())
}

/// Render a normalized row as delimited text: name, then each value verbatim
pub fn row_to_delimited(row: &str) -> String {
    let (name, values) = split_row(row);
    let delimiter = FIELD_DELIMITER.to_string();

    std::iter::once(name)
        .chain(values)
        .collect::<Vec<_>>()
        .join(&delimiter)
}

/// A number written with digits; `inf` and `NaN` are words of a name
fn is_numeric(token: &str) -> bool {
    token.bytes().any(|b| b.is_ascii_digit()) && token.parse::<f64>().is_ok()
}
