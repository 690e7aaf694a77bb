use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::ImportConfig;
use crate::error::{CriticalityError, Result, ValidationError};

use super::import::{Candidate, read_records};
use super::record::ComparisonRecord;

/// Outcome of feeding a batch of candidates into a [`RecordStore`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IngestReport {
    pub accepted: usize,
    pub rejected: Vec<ValidationError>,
    /// Accepted records whose multiplier was missing or non-finite.
    pub defaulted_multipliers: usize,
}

impl IngestReport {
    pub fn summary(&self) -> String {
        let mut text = format!("{} records accepted", self.accepted);
        if !self.rejected.is_empty() {
            text.push_str(&format!(", {} dropped", self.rejected.len()));
        }
        if self.defaulted_multipliers > 0 {
            text.push_str(&format!(
                ", {} multipliers defaulted to 1",
                self.defaulted_multipliers
            ));
        }
        text
    }
}

/// Ordered, validated comparison records for one analysis session.
#[derive(Clone, Debug, Default)]
pub struct RecordStore {
    records: Vec<ComparisonRecord>,
    ids: HashSet<u64>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_candidates(candidates: impl IntoIterator<Item = Candidate>) -> (Self, IngestReport) {
        let mut store = Self::new();
        let report = store.ingest(candidates);
        (store, report)
    }

    pub fn from_records(records: impl IntoIterator<Item = ComparisonRecord>) -> (Self, IngestReport) {
        Self::from_candidates(records.into_iter().map(Ok))
    }

    /// Reads a `.csv` or `.json` comparison file into a fresh store.
    pub fn load(path: &Path, config: &ImportConfig) -> Result<(Self, IngestReport)> {
        let candidates = read_records(path, config)?;
        Ok(Self::from_candidates(candidates))
    }

    /// Appends every valid candidate in order. Invalid ones are dropped and
    /// listed in the report; the batch always completes.
    pub fn ingest(&mut self, candidates: impl IntoIterator<Item = Candidate>) -> IngestReport {
        let mut report = IngestReport::default();

        for (index, candidate) in candidates.into_iter().enumerate() {
            let outcome = candidate.and_then(|record| self.push(record, index + 1));
            match outcome {
                Ok(defaulted) => {
                    report.accepted += 1;
                    if defaulted {
                        report.defaulted_multipliers += 1;
                    }
                }
                Err(error) => {
                    debug!(%error, "dropping comparison record");
                    report.rejected.push(error);
                }
            }
        }

        if !report.rejected.is_empty() {
            warn!(
                dropped = report.rejected.len(),
                accepted = report.accepted,
                "some comparison records failed validation"
            );
        }
        info!("{}", report.summary());
        report
    }

    /// Returns whether the record's multiplier will be defaulted.
    fn push(&mut self, record: ComparisonRecord, row: usize) -> Result<bool, ValidationError> {
        if record.repo_a.is_empty() {
            return Err(ValidationError::MissingField {
                row,
                field: "repo_a",
            });
        }
        if record.repo_b.is_empty() {
            return Err(ValidationError::MissingField {
                row,
                field: "repo_b",
            });
        }
        if record.repo_a == record.repo_b {
            return Err(ValidationError::SameRepository {
                row,
                repo: record.repo_a,
            });
        }
        if !self.ids.insert(record.id) {
            return Err(ValidationError::DuplicateId { row, id: record.id });
        }

        let defaulted = !record.has_usable_multiplier();
        self.records.push(record);
        Ok(defaulted)
    }

    pub fn records(&self) -> &[ComparisonRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The records, or [`CriticalityError::EmptyInput`] when there are none.
    pub fn require_records(&self) -> Result<&[ComparisonRecord]> {
        if self.records.is_empty() {
            Err(CriticalityError::EmptyInput)
        } else {
            Ok(&self.records)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Choice;

    #[test]
    fn invalid_records_are_dropped_without_aborting() {
        let records = vec![
            ComparisonRecord::new(0, "a/x", "a/y", "a/x", Choice::A, 2.0),
            ComparisonRecord::new(1, "a/x", "a/x", "a/x", Choice::A, 2.0),
            ComparisonRecord::new(0, "a/y", "a/z", "a/x", Choice::B, 2.0),
            ComparisonRecord::new(3, "", "a/z", "a/x", Choice::B, 2.0),
            ComparisonRecord::new(4, "a/y", "a/z", "a/x", Choice::B, f64::NAN),
        ];
        let (store, report) = RecordStore::from_records(records);

        assert_eq!(store.len(), 2);
        assert_eq!(report.accepted, 2);
        assert_eq!(report.defaulted_multipliers, 1);
        assert_eq!(
            report.rejected,
            vec![
                ValidationError::SameRepository {
                    row: 2,
                    repo: "a/x".to_owned()
                },
                ValidationError::DuplicateId { row: 3, id: 0 },
                ValidationError::MissingField {
                    row: 4,
                    field: "repo_a"
                },
            ]
        );
        assert_eq!(store.records()[1].id, 4);
    }

    #[test]
    fn empty_store_signals_empty_input() {
        let store = RecordStore::new();
        assert!(matches!(
            store.require_records(),
            Err(CriticalityError::EmptyInput)
        ));
    }

    #[test]
    fn upstream_rejections_pass_through() {
        let candidates = vec![
            Err(ValidationError::Malformed { row: 1 }),
            Ok(ComparisonRecord::new(1, "a/x", "a/y", "a/x", Choice::A, 1.0)),
        ];
        let (store, report) = RecordStore::from_candidates(candidates);
        assert_eq!(store.len(), 1);
        assert_eq!(report.rejected, vec![ValidationError::Malformed { row: 1 }]);
        assert_eq!(report.summary(), "1 records accepted, 1 dropped");
    }
}
