use std::fmt;

use crate::error::{LoadError, PeptideError};

// ---------------------------------------------------------------------------
// Direction – which way a matrix is reduced
// ---------------------------------------------------------------------------

/// Row-wise (`Forward`) or column-wise (`Reciprocal`) reading of a PAE matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Forward,
    Reciprocal,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Forward, Direction::Reciprocal];

    /// Column label used for a file's values in this direction.
    pub fn column_label(self, file_id: &str) -> String {
        match self {
            Direction::Forward => file_id.to_string(),
            Direction::Reciprocal => format!("{file_id}_reciprocal_min"),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => write!(f, "forward"),
            Direction::Reciprocal => write!(f, "reciprocal"),
        }
    }
}

// ---------------------------------------------------------------------------
// ErrorMatrix – one square PAE matrix
// ---------------------------------------------------------------------------

/// A validated N×N predicted-aligned-error matrix, stored row-major.
///
/// Row `i` and column `i` both refer to residue `i` (0-based here, 1-based
/// in anything shown to a user).
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorMatrix {
    size: usize,
    values: Vec<f64>,
}

impl ErrorMatrix {
    /// Build from nested rows. Fails unless the input is non-empty, square,
    /// and every entry is finite and non-negative.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, LoadError> {
        let size = rows.len();
        if size == 0 {
            return Err(LoadError::Empty);
        }

        let mut values = Vec::with_capacity(size * size);
        for (row, cells) in rows.into_iter().enumerate() {
            if cells.len() != size {
                return Err(LoadError::NotSquare {
                    row,
                    len: cells.len(),
                    expected: size,
                });
            }
            for (col, &value) in cells.iter().enumerate() {
                if !value.is_finite() || value < 0.0 {
                    return Err(LoadError::InvalidValue { row, col, value });
                }
            }
            values.extend(cells);
        }

        Ok(ErrorMatrix { size, values })
    }

    /// Residue count N.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.size + col]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        let start = i * self.size;
        &self.values[start..start + self.size]
    }

    pub fn column(&self, i: usize) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().skip(i).step_by(self.size).copied()
    }

    /// The PAE profile of residue `i` read in `direction`.
    pub fn trace(&self, direction: Direction, i: usize) -> Vec<f64> {
        match direction {
            Direction::Forward => self.row(i).to_vec(),
            Direction::Reciprocal => self.column(i).collect(),
        }
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|r| (r + 1..self.size).all(|c| self.get(r, c) == self.get(c, r)))
    }
}

// ---------------------------------------------------------------------------
// PeptideSpec – the shared N-terminal peptide
// ---------------------------------------------------------------------------

/// The N-terminal peptide common to every complex in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeptideSpec {
    residues: Vec<char>,
}

impl PeptideSpec {
    /// Parse a one-letter sequence. Codes are upper-cased; anything that is
    /// not an ASCII letter is rejected.
    pub fn new(sequence: &str) -> Result<Self, PeptideError> {
        let sequence = sequence.trim();
        if sequence.is_empty() {
            return Err(PeptideError::Empty);
        }
        let residues = sequence
            .chars()
            .enumerate()
            .map(|(i, c)| {
                if c.is_ascii_alphabetic() {
                    Ok(c.to_ascii_uppercase())
                } else {
                    Err(PeptideError::InvalidCode {
                        code: c,
                        position: i + 1,
                    })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PeptideSpec { residues })
    }

    /// Peptide length L.
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Identity of residue `num` (1-based).
    pub fn residue(&self, num: usize) -> Option<char> {
        num.checked_sub(1).and_then(|i| self.residues.get(i)).copied()
    }

    pub fn residues(&self) -> &[char] {
        &self.residues
    }

    /// `A1`, `B2`, ... as used in plot legends.
    pub fn residue_label(&self, num: usize) -> String {
        match self.residue(num) {
            Some(code) => format!("{code}{num}"),
            None => num.to_string(),
        }
    }
}

impl fmt::Display for PeptideSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.residues {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Minima and records
// ---------------------------------------------------------------------------

/// One minimum per peptide residue, in peptide order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidueMinimaVector {
    pub direction: Direction,
    pub values: Vec<f64>,
}

/// Join key of the combined tables. Orders by residue number first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResidueKey {
    pub residue_num: usize,
    pub residue_identity: char,
}

/// One row of a per-file table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerFileRecord {
    pub residue_num: usize,
    pub residue_identity: char,
    pub value: f64,
}

impl PerFileRecord {
    pub fn key(&self) -> ResidueKey {
        ResidueKey {
            residue_num: self.residue_num,
            residue_identity: self.residue_identity,
        }
    }
}

/// A labeled column of minima for a single file.
#[derive(Debug, Clone, PartialEq)]
pub struct PerFileSummary {
    /// Column header: the file id, or `<id>_reciprocal_min`.
    pub label: String,
    pub direction: Direction,
    pub records: Vec<PerFileRecord>,
}

/// Forward and reciprocal summaries of one successfully processed file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSummaries {
    pub file_id: String,
    pub forward: PerFileSummary,
    pub reciprocal: PerFileSummary,
}

impl FileSummaries {
    pub fn get(&self, direction: Direction) -> &PerFileSummary {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Reciprocal => &self.reciprocal,
        }
    }
}
