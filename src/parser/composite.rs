//! Composite file splitting.
//!
//! A composite export holds three data sections, each introduced by one or
//! more `#` header lines:
//!
//! ```text
//! #SizeStream Core Measurements
//! #format - Measurement Valid (1 = valid), Measurement Name, Measurement
//! 1  Actual Weight: 1.2
//! #SizeStream Custom Measurements
//! 1  *****  Body Fat / Fitness: *****
//! 1  Chest: 3.4
//! #SizeStream Landmarks
//! 1  AbdomenBack	5.6	7.8	-9.10
//! ```
//!
//! Core and custom measurements are joined into the anthro rows; the third
//! section becomes the landmark rows.

use crate::constants::{COMMENT_MARKER, HEADER_MARKER, LANDMARK_COORDINATES};
use crate::error::{Result, SplitterError};
use crate::models::SplitComposite;
use crate::parser::line::{normalize_numbered, row_to_delimited, split_row};
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SplitState {
    InHeader,
    InBody,
}

/// Split the lines of one composite file into anthro and landmark rows
pub fn split<I, S>(lines: I) -> Result<SplitComposite>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut state = SplitState::InHeader;
    let mut chunks: Vec<Vec<String>> = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for (index, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        let is_header = line.starts_with(HEADER_MARKER);

        state = match (state, is_header) {
            (SplitState::InHeader, true) => SplitState::InHeader,
            (SplitState::InBody, true) => {
                chunks.push(std::mem::take(&mut current));
                SplitState::InHeader
            }
            (_, false) => {
                push_body_line(&mut current, line, index + 1)?;
                SplitState::InBody
            }
        };
    }

    if state == SplitState::InBody {
        chunks.push(current);
    }

    let [core, custom, landmark]: [Vec<String>; 3] =
        chunks
            .try_into()
            .map_err(|chunks: Vec<Vec<String>>| SplitterError::MalformedComposite {
                chunks: chunks.len(),
            })?;

    debug!(
        "Split composite: {} core, {} custom, {} landmark rows",
        core.len(),
        custom.len(),
        landmark.len()
    );

    let anthro = core
        .iter()
        .chain(custom.iter())
        .map(|row| row_to_delimited(row))
        .collect();

    let landmark = landmark
        .iter()
        .map(|row| {
            let (name, coordinates) = split_row(row);
            if coordinates.len() != LANDMARK_COORDINATES {
                warn!(
                    "Landmark '{}' has {} coordinates, expected {}",
                    name,
                    coordinates.len(),
                    LANDMARK_COORDINATES
                );
            }
            row_to_delimited(row)
        })
        .collect();

    Ok(SplitComposite { anthro, landmark })
}

fn push_body_line(chunk: &mut Vec<String>, line: &str, line_number: usize) -> Result<()> {
    let normalized = normalize_numbered(line, line_number)?;

    if normalized.contains(COMMENT_MARKER) {
        trace!("Discarding comment on line {}: {}", line_number, normalized);
        return Ok(());
    }

    chunk.push(normalized);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADERS_AND_JOIN: &str = "\
#SizeStream Measurements
#Stored on Tue May 18 06:49:24 2021
#SizeStream Core Measurements
#format - Measurement Valid (1 = valid), Measurement Name, Measurement
#
1  Actual Weight: 1.2
#SizeStream Custom Measurements
#format - Measurement Valid (1 = valid), Measurement Name, Measurement
#
1  Chest: 3.4
#SizeStream Landmarks
#format - Landmarks Valid (1 = valid), Landmark Name, Landmark x y z
#
1  AbdomenBack\t5.6\t7.8\t-9.10
";

    const WITH_COMMENTS: &str = "\
#SizeStream Measurements
#Stored on Tue May 18 06:49:24 2021
#SizeStream Core Measurements
#format - Measurement Valid (1 = valid), Measurement Name, Measurement
#
1  Actual Weight: 1.2
#SizeStream Custom Measurements
#format - Measurement Valid (1 = valid), Measurement Name, Measurement
#
1  *****  Body Fat / Fitness: *****
1  Chest: 3.4
#SizeStream Landmarks
#format - Landmarks Valid (1 = valid), Landmark Name, Landmark x y z
#
1  AbdomenBack\t5.6\t7.8\t-9.10
";

    #[test]
    fn test_headers_discarded_and_anthro_joined() {
        let split = split(HEADERS_AND_JOIN.lines()).unwrap();

        assert_eq!(split.anthro, vec!["Actual Weight,1.2", "Chest,3.4"]);
        assert_eq!(split.landmark, vec!["AbdomenBack,5.6,7.8,-9.10"]);
    }

    #[test]
    fn test_comments_discarded() {
        let split = split(WITH_COMMENTS.lines()).unwrap();

        assert_eq!(split.anthro, vec!["Actual Weight,1.2", "Chest,3.4"]);
        assert_eq!(split.landmark, vec!["AbdomenBack,5.6,7.8,-9.10"]);
    }

    #[test]
    fn test_order_preserved_across_sections() {
        let source = "\
#core
1  A: 1
1  B: 2
#custom
1  C: 3
0  D: 4
#landmarks
1  L1 1 2 3
1  L2 4 5 6
1  L3 7 8 9
";
        let split = split(source.lines()).unwrap();

        assert_eq!(split.anthro, vec!["A,1", "B,2", "C,3", "D,4"]);
        assert_eq!(split.landmark, vec!["L1,1,2,3", "L2,4,5,6", "L3,7,8,9"]);
    }

    #[test]
    fn test_missing_landmark_section() {
        let source = "#core\n1  A: 1\n#custom\n1  B: 2\n";

        match split(source.lines()).unwrap_err() {
            SplitterError::MalformedComposite { chunks } => assert_eq!(chunks, 2),
            other => panic!("Expected MalformedComposite error, got {other:?}"),
        }
    }

    #[test]
    fn test_extra_section_rejected() {
        let source = "#a\n1  A: 1\n#b\n1  B: 2\n#c\n1  C 1 2 3\n#d\n1  D: 4\n";

        match split(source.lines()).unwrap_err() {
            SplitterError::MalformedComposite { chunks } => assert_eq!(chunks, 4),
            other => panic!("Expected MalformedComposite error, got {other:?}"),
        }
    }

    #[test]
    fn test_trailing_header_closes_last_chunk_once() {
        let source = "#a\n1  A: 1\n#b\n1  B: 2\n#c\n1  C 1 2 3\n#end\n";
        let split = split(source.lines()).unwrap();

        assert_eq!(split.landmark, vec!["C,1,2,3"]);
    }

    #[test]
    fn test_headers_only_file() {
        let source = "#SizeStream Measurements\n#\n";

        match split(source.lines()).unwrap_err() {
            SplitterError::MalformedComposite { chunks } => assert_eq!(chunks, 0),
            other => panic!("Expected MalformedComposite error, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_data_line_reports_line_number() {
        let source = "#a\n1  A: 1\n1  \n#b\n1  B: 2\n#c\n1  C 1 2 3\n";

        match split(source.lines()).unwrap_err() {
            SplitterError::MalformedLine { line_number, .. } => assert_eq!(line_number, 3),
            other => panic!("Expected MalformedLine error, got {other:?}"),
        }
    }

    #[test]
    fn test_comment_only_section_still_counts() {
        let source = "#a\n1  A: 1\n#b\n1  ***** Custom *****\n#c\n1  C 1 2 3\n";
        let split = split(source.lines()).unwrap();

        assert_eq!(split.anthro, vec!["A,1"]);
        assert_eq!(split.landmark, vec!["C,1,2,3"]);
    }
}
