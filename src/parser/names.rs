//! Canonical measurement names from a reference table.

use crate::constants::FIELD_DELIMITER;

/// Return the first field of every non-blank line, in order.
///
/// A header line is treated like any other line and yields the first name.
pub fn extract_measurement_names(reference: &str) -> Vec<String> {
    reference
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            line.split(FIELD_DELIMITER)
                .next()
                .unwrap_or_default()
                .trim()
                .to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_from_split_table() {
        let reference = "Measurement Name,Measurement\n\
                         Actual Weight,123.45\n\
                         Abdomen Circum Tape Measure,3.14\n";

        assert_eq!(
            extract_measurement_names(reference),
            vec![
                "Measurement Name",
                "Actual Weight",
                "Abdomen Circum Tape Measure"
            ]
        );
    }

    #[test]
    fn test_names_from_single_column_list() {
        let reference = "SS_Vars\nActual_Weight\nAbdomen_Circum_Tape_Measure\n";

        assert_eq!(
            extract_measurement_names(reference),
            vec!["SS_Vars", "Actual_Weight", "Abdomen_Circum_Tape_Measure"]
        );
    }

    #[test]
    fn test_blank_lines_skipped_and_duplicates_kept() {
        let reference = "A\r\n\r\nB,1\nA,2\n";

        assert_eq!(extract_measurement_names(reference), vec!["A", "B", "A"]);
    }
}
