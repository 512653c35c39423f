//! Aggregation of per-subject anthro tables into one wide table.
//!
//! Each subject contributes one row. Columns are the identifier, the
//! location and then the canonical measurement names in order; the
//! canonical list decides which measurements appear.

use crate::constants::{FIELD_DELIMITER, ID_COLUMN, LOCATION_COLUMN};
use crate::error::{Result, SplitterError};
use crate::models::SubjectId;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Measurements of one subject, keyed by name
#[derive(Debug, Clone)]
pub struct SubjectTable {
    subject: SubjectId,
    order: Vec<String>,
    values: HashMap<String, Option<String>>,
}

impl SubjectTable {
    pub fn new(subject: SubjectId) -> Self {
        Self {
            subject,
            order: Vec::new(),
            values: HashMap::new(),
        }
    }

    /// Build a table from delimited anthro rows (`name,value[,value...]`).
    ///
    /// Only the first value of a row is kept. A repeated name keeps its
    /// first value.
    pub fn from_delimited_rows<I, S>(subject: SubjectId, rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::new(subject);

        for row in rows {
            let row = row.as_ref();
            if row.trim().is_empty() {
                continue;
            }

            let mut fields = row.split(FIELD_DELIMITER);
            let name = fields.next().unwrap_or_default().trim();
            let value = fields
                .next()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string);

            if !table.insert(name, value) {
                warn!(
                    "Subject {} repeats measurement '{}', keeping the first value",
                    table.subject, name
                );
            }
        }

        table
    }

    /// Add a measurement; returns false if the name was already present
    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) -> bool {
        let name = name.into();
        if self.values.contains_key(&name) {
            return false;
        }
        self.order.push(name.clone());
        self.values.insert(name, value);
        true
    }

    pub fn subject(&self) -> &SubjectId {
        &self.subject
    }

    /// Value of a measurement; `None` when absent or blank
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(|value| value.as_deref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Measurement names in the order they were read
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// One subject's row of the aggregate table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateRow {
    pub subject: SubjectId,
    /// One cell per measurement name; `None` renders blank
    pub cells: Vec<Option<String>>,
}

/// Wide table of subjects by canonical measurement names
#[derive(Debug, Clone)]
pub struct AggregateTable {
    names: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<AggregateRow>,
    subjects: HashSet<SubjectId>,
}

impl AggregateTable {
    /// Create an empty table over the canonical names.
    ///
    /// Repeated names and names clashing with the identifier columns are
    /// dropped with a warning.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self {
            names: Vec::new(),
            index: HashMap::new(),
            rows: Vec::new(),
            subjects: HashSet::new(),
        };

        for name in names {
            let name = name.into();
            if name == ID_COLUMN || name == LOCATION_COLUMN {
                warn!("Measurement name '{}' clashes with an identifier column, dropping it", name);
                continue;
            }
            if table.index.contains_key(&name) {
                warn!("Duplicate measurement name '{}' in canonical list, keeping the first", name);
                continue;
            }
            table.index.insert(name.clone(), table.names.len());
            table.names.push(name);
        }

        table
    }

    /// Add one subject's row.
    ///
    /// Fails without modifying the table if the subject is already present.
    pub fn insert(&mut self, table: &SubjectTable) -> Result<()> {
        let subject = table.subject();
        if self.subjects.contains(subject) {
            return Err(SplitterError::DuplicateSubject {
                id: subject.id.clone(),
                location: subject.location.clone(),
            });
        }

        let dropped: Vec<&str> = table
            .names()
            .filter(|name| !self.index.contains_key(*name))
            .collect();
        if !dropped.is_empty() {
            warn!(
                "Subject {}: dropping {} measurement(s) not in the canonical list: {}",
                subject,
                dropped.len(),
                dropped.join(", ")
            );
        }

        let cells: Vec<Option<String>> = self
            .names
            .iter()
            .map(|name| table.get(name).map(str::to_string))
            .collect();

        debug!(
            "Subject {}: {} of {} measurements present",
            subject,
            cells.iter().filter(|cell| cell.is_some()).count(),
            cells.len()
        );

        self.subjects.insert(subject.clone());
        self.rows.push(AggregateRow {
            subject: subject.clone(),
            cells,
        });
        Ok(())
    }

    /// Column headers: identifier, location, then measurement names
    pub fn columns(&self) -> Vec<&str> {
        [ID_COLUMN, LOCATION_COLUMN]
            .into_iter()
            .chain(self.names.iter().map(String::as_str))
            .collect()
    }

    pub fn measurement_names(&self) -> &[String] {
        &self.names
    }

    pub fn rows(&self) -> &[AggregateRow] {
        &self.rows
    }

    /// Row-major text records, blanks rendered as empty strings
    pub fn records(&self) -> impl Iterator<Item = Vec<&str>> {
        self.rows.iter().map(|row| {
            [row.subject.id.as_str(), row.subject.location.as_str()]
                .into_iter()
                .chain(row.cells.iter().map(|cell| cell.as_deref().unwrap_or_default()))
                .collect()
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Aggregate subject tables, in the given order, over the canonical names
pub fn aggregate<'a, I>(tables: I, names: &[String]) -> Result<AggregateTable>
where
    I: IntoIterator<Item = &'a SubjectTable>,
{
    let mut aggregate = AggregateTable::new(names.iter().cloned());
    for table in tables {
        aggregate.insert(table)?;
    }
    Ok(aggregate)
}

/// Union of measurement names across subjects, in first-seen order
pub fn union_of_names<'a, I>(tables: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a SubjectTable>,
{
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for table in tables {
        for name in table.names() {
            if seen.insert(name) {
                names.push(name.to_string());
            }
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject_table(id: &str, measurements: &[(&str, &str)]) -> SubjectTable {
        let mut table = SubjectTable::new(SubjectId::new(id, "CPEN"));
        for (name, value) in measurements {
            table.insert(*name, Some(value.to_string()));
        }
        table
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_missing_measurements_render_blank() {
        let first = subject_table("1", &[("A", "1.0"), ("B", "2.0")]);
        let second = subject_table("2", &[("B", "3.0"), ("C", "4.0")]);

        let table = aggregate([&first, &second], &names(&["A", "B", "C"])).unwrap();

        assert_eq!(table.columns(), vec!["id", "location", "A", "B", "C"]);
        assert_eq!(
            table.rows()[0].cells,
            vec![Some("1.0".to_string()), Some("2.0".to_string()), None]
        );
        assert_eq!(
            table.rows()[1].cells,
            vec![None, Some("3.0".to_string()), Some("4.0".to_string())]
        );

        let records: Vec<Vec<&str>> = table.records().collect();
        assert_eq!(records[0], vec!["1", "CPEN", "1.0", "2.0", ""]);
        assert_eq!(records[1], vec!["2", "CPEN", "", "3.0", "4.0"]);
    }

    #[test]
    fn test_unlisted_measurements_dropped() {
        let subject = subject_table("1", &[("A", "1.0"), ("Z", "9.9")]);
        let table = aggregate([&subject], &names(&["A"])).unwrap();

        assert_eq!(table.columns(), vec!["id", "location", "A"]);
        assert_eq!(table.rows()[0].cells, vec![Some("1.0".to_string())]);
    }

    #[test]
    fn test_duplicate_subject_fails() {
        let first = subject_table("1", &[("A", "1.0")]);
        let second = subject_table("1", &[("A", "2.0")]);

        match aggregate([&first, &second], &names(&["A"])).unwrap_err() {
            SplitterError::DuplicateSubject { id, location } => {
                assert_eq!(id, "1");
                assert_eq!(location, "CPEN");
            }
            other => panic!("Expected DuplicateSubject error, got {other:?}"),
        }
    }

    #[test]
    fn test_rejected_insert_leaves_table_untouched() {
        let first = subject_table("1", &[("A", "1.0")]);
        let mut table = AggregateTable::new(names(&["A"]));
        table.insert(&first).unwrap();

        assert!(table.insert(&first).is_err());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_same_id_different_location_is_distinct() {
        let first = subject_table("1", &[("A", "1.0")]);
        let mut second = SubjectTable::new(SubjectId::new("1", "LDN"));
        second.insert("A", Some("2.0".to_string()));

        let table = aggregate([&first, &second], &names(&["A"])).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_canonical_names_deduplicated() {
        let table = AggregateTable::new(names(&["A", "B", "A", "id"]));
        assert_eq!(table.measurement_names(), &names(&["A", "B"])[..]);
    }

    #[test]
    fn test_subject_table_from_rows() {
        let rows = [
            "Actual Weight,1.2",
            "Bust60DegreesLeft,1.2,3.4,5.6",
            "",
            "Actual Weight,9.9",
            "Empty",
        ];
        let table = SubjectTable::from_delimited_rows(SubjectId::new("1", ""), rows);

        assert_eq!(table.len(), 3);
        assert_eq!(table.get("Actual Weight"), Some("1.2"));
        assert_eq!(table.get("Bust60DegreesLeft"), Some("1.2"));
        assert!(table.contains("Empty"));
        assert_eq!(table.get("Empty"), None);
    }

    #[test]
    fn test_union_of_names_first_seen_order() {
        let first = subject_table("1", &[("B", "1"), ("A", "2")]);
        let second = subject_table("2", &[("C", "3"), ("A", "4")]);

        assert_eq!(union_of_names([&first, &second]), names(&["B", "A", "C"]));
    }
}
