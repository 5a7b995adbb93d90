//! Tabular symptom store.
//!
//! An optional CSV table with the header `Symptom, Condition, Severity, Recommendation, Notes`
//! that augments the knowledge base. Every column except `Symptom` may be absent, and empty
//! cells are normalised to `None` at load time so callers never see empty strings.
//!
//! Loading is all-or-nothing: a missing file, a missing `Symptom` column or any malformed row
//! yields [`AdvisorError::DataSourceUnavailable`]. [`SymptomStore::load_or_empty`] turns that
//! into an empty store plus a warning for the shell to display.

use crate::{AdvisorError, AdvisorResult};
use advisor_types::NonEmptyText;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const SYMPTOM_COLUMN: &str = "Symptom";

/// Columns of a recorded row, in the order they are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecordField {
    Condition,
    Severity,
    Recommendation,
    Notes,
}

impl RecordField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Condition => "Possible Condition",
            Self::Severity => "Recorded Severity",
            Self::Recommendation => "Recommendation",
            Self::Notes => "Notes",
        }
    }
}

/// One row of the symptom table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymptomRecord {
    pub symptom: NonEmptyText,
    pub condition: Option<NonEmptyText>,
    pub severity: Option<NonEmptyText>,
    pub recommendation: Option<NonEmptyText>,
    pub notes: Option<NonEmptyText>,
}

impl SymptomRecord {
    /// The populated fields, in the fixed order Condition, Severity, Recommendation, Notes.
    pub fn present_fields(&self) -> Vec<(RecordField, &str)> {
        [
            (RecordField::Condition, &self.condition),
            (RecordField::Severity, &self.severity),
            (RecordField::Recommendation, &self.recommendation),
            (RecordField::Notes, &self.notes),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_ref().map(|v| (field, v.as_str())))
        .collect()
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Symptom")]
    symptom: Option<String>,
    #[serde(rename = "Condition", default)]
    condition: Option<String>,
    #[serde(rename = "Severity", default)]
    severity: Option<String>,
    #[serde(rename = "Recommendation", default)]
    recommendation: Option<String>,
    #[serde(rename = "Notes", default)]
    notes: Option<String>,
}

/// Read-only collection of recorded symptom rows.
#[derive(Debug, Clone, Default)]
pub struct SymptomStore {
    records: Vec<SymptomRecord>,
}

impl SymptomStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<SymptomRecord>) -> Self {
        Self { records }
    }

    /// Loads the store from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns `AdvisorError::DataSourceUnavailable` if the file cannot be opened or parsed.
    pub fn load(path: &Path) -> AdvisorResult<Self> {
        let source_name = path.display().to_string();
        let file = File::open(path).map_err(|e| unavailable(&source_name, e))?;
        Self::from_reader(file, &source_name)
    }

    /// Parses CSV content from any reader. `source_name` only labels errors.
    pub fn from_reader<R: Read>(reader: R, source_name: &str) -> AdvisorResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| unavailable(source_name, e))?;
        if !headers.iter().any(|h| h == SYMPTOM_COLUMN) {
            return Err(unavailable(
                source_name,
                format!("missing '{SYMPTOM_COLUMN}' column"),
            ));
        }

        let mut records = Vec::new();
        for (index, row) in csv_reader.deserialize::<CsvRow>().enumerate() {
            let row = row.map_err(|e| unavailable(source_name, e))?;
            let Some(symptom) = NonEmptyText::optional(row.symptom) else {
                tracing::debug!("skipping row {} with blank symptom", index + 1);
                continue;
            };
            records.push(SymptomRecord {
                symptom,
                condition: NonEmptyText::optional(row.condition),
                severity: NonEmptyText::optional(row.severity),
                recommendation: NonEmptyText::optional(row.recommendation),
                notes: NonEmptyText::optional(row.notes),
            });
        }

        tracing::info!("loaded {} symptom rows from {}", records.len(), source_name);
        Ok(Self { records })
    }

    /// Loads the store, degrading to an empty store when the file is unusable.
    ///
    /// The error, if any, is logged once and returned so the shell can show it as a warning.
    pub fn load_or_empty(path: &Path) -> (Self, Option<AdvisorError>) {
        match Self::load(path) {
            Ok(store) => (store, None),
            Err(e) => {
                tracing::warn!("symptom store unavailable, continuing without it: {}", e);
                (Self::empty(), Some(e))
            }
        }
    }

    /// First row whose symptom matches case-insensitively.
    pub fn find(&self, symptom: &str) -> Option<&SymptomRecord> {
        self.records.iter().find(|r| r.symptom.eq_ignore_case(symptom))
    }

    pub fn records(&self) -> &[SymptomRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub(crate) fn unavailable(source_name: &str, reason: impl std::fmt::Display) -> AdvisorError {
    AdvisorError::DataSourceUnavailable {
        source_name: source_name.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = "\
Symptom,Condition,Severity,Recommendation,Notes
Fever,Viral infection,Moderate,Rest and fluids,
Cough,,Mild,,Worse at night
fever,Duplicate row,High,,
";

    #[test]
    fn test_parses_rows_and_normalises_empty_cells() {
        let store = SymptomStore::from_reader(SAMPLE.as_bytes(), "sample").unwrap();
        assert_eq!(store.len(), 3);

        let cough = store.find("cough").unwrap();
        assert_eq!(cough.condition, None);
        assert_eq!(cough.recommendation, None);
        assert_eq!(cough.notes.as_ref().unwrap().as_str(), "Worse at night");
    }

    #[test]
    fn test_find_returns_first_match_case_insensitively() {
        let store = SymptomStore::from_reader(SAMPLE.as_bytes(), "sample").unwrap();
        let fever = store.find("FEVER").unwrap();
        assert_eq!(fever.condition.as_ref().unwrap().as_str(), "Viral infection");
        assert!(store.find("Headache").is_none());
    }

    #[test]
    fn test_present_fields_order_and_filtering() {
        let store = SymptomStore::from_reader(SAMPLE.as_bytes(), "sample").unwrap();

        let fever = store.find("Fever").unwrap();
        assert_eq!(
            fever.present_fields(),
            vec![
                (RecordField::Condition, "Viral infection"),
                (RecordField::Severity, "Moderate"),
                (RecordField::Recommendation, "Rest and fluids"),
            ]
        );

        let cough = store.find("Cough").unwrap();
        assert_eq!(
            cough.present_fields(),
            vec![
                (RecordField::Severity, "Mild"),
                (RecordField::Notes, "Worse at night"),
            ]
        );
    }

    #[test]
    fn test_whitespace_cells_are_absent() {
        let csv = "Symptom,Condition,Severity,Recommendation,Notes\nNausea,   ,,  ,\n";
        let store = SymptomStore::from_reader(csv.as_bytes(), "ws").unwrap();
        assert!(store.find("Nausea").unwrap().present_fields().is_empty());
    }

    #[test]
    fn test_optional_columns_may_be_missing() {
        let csv = "Symptom,Condition\nRash,Allergy\n";
        let store = SymptomStore::from_reader(csv.as_bytes(), "partial").unwrap();
        let rash = store.find("rash").unwrap();
        assert_eq!(rash.condition.as_ref().unwrap().as_str(), "Allergy");
        assert_eq!(rash.notes, None);
    }

    #[test]
    fn test_blank_symptom_rows_are_skipped() {
        let csv = "Symptom,Condition\n,Orphan\nRash,Allergy\n";
        let store = SymptomStore::from_reader(csv.as_bytes(), "blank").unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_missing_symptom_column_is_unavailable() {
        let csv = "Name,Condition\nRash,Allergy\n";
        let err = SymptomStore::from_reader(csv.as_bytes(), "bad").expect_err("should fail");
        assert!(matches!(err, AdvisorError::DataSourceUnavailable { reason, .. } if reason.contains("Symptom")));
    }

    #[test]
    fn test_malformed_row_is_unavailable() {
        let csv = "Symptom,Condition\nRash,Allergy,Extra,Fields\n";
        let err = SymptomStore::from_reader(csv.as_bytes(), "bad").expect_err("should fail");
        assert!(matches!(err, AdvisorError::DataSourceUnavailable { .. }));
    }

    #[test]
    fn test_load_or_empty_on_missing_file() {
        let temp = TempDir::new().unwrap();
        let (store, warning) = SymptomStore::load_or_empty(&temp.path().join("nope.csv"));
        assert!(store.is_empty());
        assert!(matches!(
            warning,
            Some(AdvisorError::DataSourceUnavailable { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("symptoms_data.csv");
        std::fs::write(&path, SAMPLE).unwrap();

        let (store, warning) = SymptomStore::load_or_empty(&path);
        assert!(warning.is_none());
        assert_eq!(store.len(), 3);
    }
}
