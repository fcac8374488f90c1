use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Per-stage errors
// ---------------------------------------------------------------------------

/// Failure to turn a raw payload into an [`ErrorMatrix`](crate::data::model::ErrorMatrix).
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("parsing JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a top-level JSON object with a 'pae' field")]
    MissingPae,

    #[error("'pae' is not an array")]
    NotAnArray,

    #[error("'pae' matrix is empty")]
    Empty,

    #[error("pae row {row} is not an array")]
    RowNotArray { row: usize },

    #[error("pae[{row}][{col}]: not a number")]
    NotNumeric { row: usize, col: usize },

    #[error("pae[{row}][{col}]: {value} is not a non-negative finite value")]
    InvalidValue { row: usize, col: usize, value: f64 },

    #[error("matrix is not square: row {row} has {len} values, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },
}

/// The reduction tail `[L..N)` is empty.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error(
        "peptide length {peptide_len} leaves no residues to compare against \
         in a {matrix_size}x{matrix_size} matrix"
    )]
    EmptyTail {
        peptide_len: usize,
        matrix_size: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SummaryError {
    #[error("{values} minima supplied for a peptide of length {peptide_len}")]
    LengthMismatch { values: usize, peptide_len: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregationError {
    #[error("column '{0}' is already present in the combined table")]
    DuplicateColumn(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeptideError {
    #[error("peptide sequence is empty")]
    Empty,

    #[error("invalid residue code '{code}' at position {position}")]
    InvalidCode { code: char, position: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error(transparent)]
    Peptide(#[from] PeptideError),

    #[error("residue {residue} is outside the peptide (1..={peptide_len})")]
    ResidueOutOfRange { residue: usize, peptide_len: usize },
}

// ---------------------------------------------------------------------------
// File-level wrapper
// ---------------------------------------------------------------------------

/// Any reason a single file is excluded from a batch.
#[derive(Error, Debug)]
pub enum FileError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Summary(#[from] SummaryError),

    #[error(transparent)]
    Aggregation(#[from] AggregationError),
}
