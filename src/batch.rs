//! Batch driver: one result per file, failures filtered before aggregation.

use std::fmt;

use crate::data::aggregate::{BatchAggregator, CombinedTables};
use crate::data::loader::parse_pae_json;
use crate::data::minima::extract;
use crate::data::model::{ErrorMatrix, FileSummaries, PeptideSpec};
use crate::data::summary::summarize_file;
use crate::error::{FileError, LoadError};

/// Summarize an already-loaded matrix.
pub fn process_matrix(
    file_id: &str,
    matrix: &ErrorMatrix,
    peptide: &PeptideSpec,
) -> Result<FileSummaries, FileError> {
    let minima = extract(matrix, peptide)?;
    Ok(summarize_file(file_id, peptide, &minima)?)
}

/// Load, extract and summarize one raw JSON payload.
pub fn process_payload(
    file_id: &str,
    payload: &str,
    peptide: &PeptideSpec,
) -> Result<FileSummaries, FileError> {
    let matrix = parse_pae_json(payload)?;
    process_matrix(file_id, &matrix, peptide)
}

/// A file that was offered to the batch but contributed nothing.
#[derive(Debug)]
pub struct FileFailure {
    pub file_id: String,
    pub error: FileError,
}

impl fmt::Display for FileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file_id, self.error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// No files were offered at all.
    NoFiles,
    /// Files were offered but every one failed.
    NoneSucceeded,
    Partial,
    Complete,
}

impl BatchStatus {
    /// Whether combined tables carry anything worth exporting.
    pub fn has_results(self) -> bool {
        matches!(self, BatchStatus::Partial | BatchStatus::Complete)
    }
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

/// Sequential accumulator over the files of one run.
pub struct Batch {
    peptide: PeptideSpec,
    aggregator: BatchAggregator,
    processed: Vec<FileSummaries>,
    failures: Vec<FileFailure>,
}

impl Batch {
    pub fn new(peptide: PeptideSpec) -> Self {
        Batch {
            peptide,
            aggregator: BatchAggregator::new(),
            processed: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Process one file's loaded (or failed-to-load) matrix.
    ///
    /// On failure the error is logged and recorded; the aggregator is not touched.
    pub fn ingest_matrix(
        &mut self,
        file_id: &str,
        matrix: Result<ErrorMatrix, LoadError>,
    ) -> Option<&FileSummaries> {
        let outcome = matrix
            .map_err(FileError::from)
            .and_then(|m| process_matrix(file_id, &m, &self.peptide))
            .and_then(|summaries| {
                self.aggregator.fold(&summaries)?;
                Ok(summaries)
            });
        self.record(file_id, outcome)
    }

    /// Process one file's raw JSON text.
    pub fn ingest_payload(&mut self, file_id: &str, payload: &str) -> Option<&FileSummaries> {
        self.ingest_matrix(file_id, parse_pae_json(payload))
    }

    fn record(
        &mut self,
        file_id: &str,
        outcome: Result<FileSummaries, FileError>,
    ) -> Option<&FileSummaries> {
        match outcome {
            Ok(summaries) => {
                log::info!("Processed {file_id}");
                self.processed.push(summaries);
                self.processed.last()
            }
            Err(error) => {
                log::error!("Error processing file {file_id}: {error}");
                self.failures.push(FileFailure {
                    file_id: file_id.to_string(),
                    error,
                });
                None
            }
        }
    }

    pub fn finish(self) -> BatchReport {
        BatchReport {
            peptide: self.peptide,
            tables: self.aggregator.finish(),
            processed: self.processed,
            failures: self.failures,
        }
    }
}

// ---------------------------------------------------------------------------
// BatchReport
// ---------------------------------------------------------------------------

/// Everything a finished run produced.
#[derive(Debug)]
pub struct BatchReport {
    pub peptide: PeptideSpec,
    pub tables: CombinedTables,
    pub processed: Vec<FileSummaries>,
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    pub fn files_seen(&self) -> usize {
        self.processed.len() + self.failures.len()
    }

    pub fn status(&self) -> BatchStatus {
        match (self.processed.len(), self.failures.len()) {
            (0, 0) => BatchStatus::NoFiles,
            (0, _) => BatchStatus::NoneSucceeded,
            (_, 0) => BatchStatus::Complete,
            _ => BatchStatus::Partial,
        }
    }
}

/// Fold `(file_id, payload)` pairs in the order given.
pub fn run_payloads<'a, I>(peptide: PeptideSpec, payloads: I) -> BatchReport
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut batch = Batch::new(peptide);
    for (file_id, payload) in payloads {
        batch.ingest_payload(file_id, payload);
    }
    batch.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Direction, ResidueKey};

    const REFERENCE: &str = r#"{"pae": [[0,1,2,3],[1,0,3,4],[2,3,0,5],[3,4,5,0]]}"#;

    fn peptide(seq: &str) -> PeptideSpec {
        PeptideSpec::new(seq).unwrap()
    }

    #[test]
    fn empty_batch_reports_no_files() {
        let report = run_payloads(peptide("AB"), Vec::<(&str, &str)>::new());
        assert_eq!(report.status(), BatchStatus::NoFiles);
        assert!(!report.status().has_results());
        assert!(report.tables.forward.is_empty());
        assert!(report.tables.reciprocal.is_empty());
    }

    #[test]
    fn failures_are_skipped_and_counted() {
        let report = run_payloads(
            peptide("AB"),
            [
                ("bad_json", "{"),
                ("good", REFERENCE),
                ("not_square", r#"{"pae": [[0, 1, 2]]}"#),
                ("too_small", r#"{"pae": [[0, 1], [1, 0]]}"#),
            ],
        );

        assert_eq!(report.status(), BatchStatus::Partial);
        assert_eq!(report.files_seen(), 4);
        assert_eq!(report.processed.len(), 1);
        let failed: Vec<_> = report.failures.iter().map(|f| f.file_id.as_str()).collect();
        assert_eq!(failed, vec!["bad_json", "not_square", "too_small"]);
        assert!(matches!(report.failures[2].error, FileError::Extraction(_)));
        assert_eq!(report.tables.forward.columns(), &["good"]);
        assert_eq!(report.tables.reciprocal.columns(), &["good_reciprocal_min"]);
    }

    #[test]
    fn all_failures_are_distinct_from_no_files() {
        let report = run_payloads(peptide("AB"), [("x", "[]")]);
        assert_eq!(report.status(), BatchStatus::NoneSucceeded);
        assert!(report.tables.forward.is_empty());
    }

    #[test]
    fn two_files_with_reference_matrix() {
        let report = run_payloads(peptide("AB"), [("m1", REFERENCE), ("m2", REFERENCE)]);
        assert_eq!(report.status(), BatchStatus::Complete);

        let k2 = ResidueKey { residue_num: 2, residue_identity: 'B' };
        let fwd = report.tables.get(Direction::Forward);
        assert_eq!(fwd.get(&k2, "m1"), Some(3.0));
        assert_eq!(fwd.get(&k2, "m2"), Some(3.0));
        assert_eq!(report.processed[0].forward.records[0].value, 2.0);
    }

    #[test]
    fn single_payload_outside_a_batch() {
        let files = process_payload("m1", REFERENCE, &peptide("AB")).unwrap();
        assert_eq!(files.file_id, "m1");
        assert_eq!(files.get(Direction::Reciprocal).records[1].value, 3.0);
        assert!(process_payload("m1", REFERENCE, &peptide("ABCD")).is_err());
    }

    #[test]
    fn repeated_file_id_is_a_per_file_failure() {
        let report = run_payloads(peptide("AB"), [("m1", REFERENCE), ("m1", REFERENCE)]);
        assert_eq!(report.status(), BatchStatus::Partial);
        assert!(matches!(report.failures[0].error, FileError::Aggregation(_)));
        assert_eq!(report.processed.len(), 1);
    }

    #[test]
    fn file_named_like_a_reciprocal_column_is_accepted() {
        let report = run_payloads(
            peptide("AB"),
            [("foo", REFERENCE), ("foo_reciprocal_min", REFERENCE)],
        );
        assert_eq!(report.status(), BatchStatus::Complete);
        assert_eq!(report.processed.len(), 2);
        assert_eq!(report.tables.forward.columns(), &["foo", "foo_reciprocal_min"]);
    }
}
