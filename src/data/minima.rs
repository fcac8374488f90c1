use super::model::{Direction, ErrorMatrix, PeptideSpec, ResidueMinimaVector};
use crate::error::ExtractionError;

// ---------------------------------------------------------------------------
// Minima extraction
// ---------------------------------------------------------------------------
//
// For peptide residue i the reduced range is always [L, N): the first L
// entries (the peptide itself) are skipped for every residue, not a window
// around i.

/// Forward and reciprocal minima of one matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedMinima {
    pub forward: ResidueMinimaVector,
    pub reciprocal: ResidueMinimaVector,
}

/// Compute both minima vectors for `peptide` against `matrix`.
pub fn extract(matrix: &ErrorMatrix, peptide: &PeptideSpec) -> Result<ExtractedMinima, ExtractionError> {
    Ok(ExtractedMinima {
        forward: minima(matrix, peptide.len(), Direction::Forward)?,
        reciprocal: minima(matrix, peptide.len(), Direction::Reciprocal)?,
    })
}

/// Minimum of `trace(i)[peptide_len..]` for each `i` in `0..peptide_len`.
pub fn minima(
    matrix: &ErrorMatrix,
    peptide_len: usize,
    direction: Direction,
) -> Result<ResidueMinimaVector, ExtractionError> {
    let n = matrix.size();
    if peptide_len >= n {
        return Err(ExtractionError::EmptyTail {
            peptide_len,
            matrix_size: n,
        });
    }

    let values = (0..peptide_len)
        .map(|i| match direction {
            Direction::Forward => tail_min(matrix.row(i)[peptide_len..].iter().copied()),
            Direction::Reciprocal => tail_min(matrix.column(i).skip(peptide_len)),
        })
        .collect();

    Ok(ResidueMinimaVector { direction, values })
}

// Caller guarantees the tail is non-empty and the values finite.
fn tail_min(tail: impl Iterator<Item = f64>) -> f64 {
    tail.fold(f64::INFINITY, f64::min)
}
