use super::minima::ExtractedMinima;
use super::model::{FileSummaries, PeptideSpec, PerFileRecord, PerFileSummary, ResidueMinimaVector};
use crate::error::SummaryError;

/// Label a minima vector with residue numbers, identities and a column name.
pub fn summarize(
    file_id: &str,
    peptide: &PeptideSpec,
    minima: &ResidueMinimaVector,
) -> Result<PerFileSummary, SummaryError> {
    if minima.values.len() != peptide.len() {
        return Err(SummaryError::LengthMismatch {
            values: minima.values.len(),
            peptide_len: peptide.len(),
        });
    }

    let records = peptide
        .residues()
        .iter()
        .zip(&minima.values)
        .enumerate()
        .map(|(i, (&residue_identity, &value))| PerFileRecord {
            residue_num: i + 1,
            residue_identity,
            value,
        })
        .collect();

    Ok(PerFileSummary {
        label: minima.direction.column_label(file_id),
        direction: minima.direction,
        records,
    })
}

/// Build both summaries for one file.
pub fn summarize_file(
    file_id: &str,
    peptide: &PeptideSpec,
    minima: &ExtractedMinima,
) -> Result<FileSummaries, SummaryError> {
    Ok(FileSummaries {
        file_id: file_id.to_string(),
        forward: summarize(file_id, peptide, &minima.forward)?,
        reciprocal: summarize(file_id, peptide, &minima.reciprocal)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Direction;

    #[test]
    fn records_are_one_based_and_labeled() {
        let peptide = PeptideSpec::new("MKT").unwrap();
        let minima = ResidueMinimaVector {
            direction: Direction::Reciprocal,
            values: vec![4.0, 2.5, 9.0],
        };
        let s = summarize("model_0", &peptide, &minima).unwrap();
        assert_eq!(s.label, "model_0_reciprocal_min");
        assert_eq!(s.records.len(), 3);
        assert_eq!(s.records[0].residue_num, 1);
        assert_eq!(s.records[1].residue_identity, 'K');
        assert_eq!(s.records[2].value, 9.0);
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let peptide = PeptideSpec::new("MK").unwrap();
        let minima = ResidueMinimaVector {
            direction: Direction::Forward,
            values: vec![1.0],
        };
        assert_eq!(
            summarize("x", &peptide, &minima),
            Err(SummaryError::LengthMismatch { values: 1, peptide_len: 2 })
        );
    }
}
