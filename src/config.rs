use std::path::{Path, PathBuf};

use crate::data::model::PeptideSpec;
use crate::error::ConfigError;

/// Residues highlighted when none are given.
pub const DEFAULT_RESIDUES: [usize; 3] = [1, 2, 3];

/// On-disk table format for exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportFormat {
    #[default]
    Csv,
    Parquet,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Parquet => "parquet",
        }
    }
}

/// Settings for one batch run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_dir: PathBuf,
    pub peptide: PeptideSpec,
    /// 1-based peptide residues to highlight; they also name the output folder.
    pub residues: Vec<usize>,
    /// Parent of the output folder. Defaults to `input_dir`.
    pub output_root: Option<PathBuf>,
    pub format: ExportFormat,
    pub write_per_file: bool,
    pub print_tables: bool,
}

impl RunConfig {
    /// Highlighted residues default to [`DEFAULT_RESIDUES`] cut down to the
    /// peptide length.
    pub fn new(input_dir: impl Into<PathBuf>, peptide: &str) -> Result<Self, ConfigError> {
        let peptide = PeptideSpec::new(peptide)?;
        Ok(RunConfig {
            input_dir: input_dir.into(),
            residues: default_residues(&peptide),
            peptide,
            output_root: None,
            format: ExportFormat::default(),
            write_per_file: true,
            print_tables: false,
        })
    }

    /// Every highlighted residue must lie inside the peptide.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let peptide_len = self.peptide.len();
        match self.residues.iter().find(|&&r| r == 0 || r > peptide_len) {
            Some(&residue) => Err(ConfigError::ResidueOutOfRange {
                residue,
                peptide_len,
            }),
            None => Ok(()),
        }
    }

    /// `<root>/PAE-<PEPTIDE>_<r1>_<r2>...`
    pub fn output_dir(&self) -> PathBuf {
        let root: &Path = self.output_root.as_deref().unwrap_or(&self.input_dir);
        root.join(output_folder_name(&self.peptide, &self.residues))
    }
}

pub fn default_residues(peptide: &PeptideSpec) -> Vec<usize> {
    DEFAULT_RESIDUES
        .iter()
        .copied()
        .filter(|&r| r <= peptide.len())
        .collect()
}

pub fn output_folder_name(peptide: &PeptideSpec, residues: &[usize]) -> String {
    let residue_str = residues
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join("_");
    format!("PAE-{peptide}_{residue_str}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_folder_sits_in_input_dir() {
        let cfg = RunConfig::new("/data/run1", "mktay").unwrap();
        assert_eq!(cfg.output_dir(), PathBuf::from("/data/run1/PAE-MKTAY_1_2_3"));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn explicit_root_and_residues() {
        let mut cfg = RunConfig::new("in", "GSHM").unwrap();
        cfg.output_root = Some(PathBuf::from("out"));
        cfg.residues = vec![4, 2];
        assert_eq!(cfg.output_dir(), PathBuf::from("out/PAE-GSHM_4_2"));
    }

    #[test]
    fn defaults_are_cut_to_short_peptides() {
        let cfg = RunConfig::new("in", "AB").unwrap();
        assert_eq!(cfg.residues, vec![1, 2]);
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.output_dir(), PathBuf::from("in/PAE-AB_1_2"));

        let single = RunConfig::new("in", "W").unwrap();
        assert_eq!(single.residues, vec![1]);
    }

    #[test]
    fn explicit_residues_outside_peptide_are_rejected() {
        let mut cfg = RunConfig::new("in", "AB").unwrap();
        cfg.residues = vec![1, 3];
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::ResidueOutOfRange { residue: 3, peptide_len: 2 })
        );
        cfg.residues = vec![0];
        assert!(cfg.validate().is_err());
    }
}
