use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use pae_minima::batch::{Batch, BatchReport};
use pae_minima::config::default_residues;
use pae_minima::data::loader::load_file;
use pae_minima::data::model::{Direction, ErrorMatrix, PeptideSpec};
use pae_minima::discover;

use crate::color::ResiduePalette;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// A prediction whose matrix parsed successfully.
pub struct LoadedFile {
    pub file_id: String,
    pub matrix: ErrorMatrix,
}

/// The full viewer state, independent of rendering.
pub struct AppState {
    /// Folder currently shown (None until the user opens one).
    pub folder: Option<PathBuf>,

    /// Peptide text as typed in the top bar.
    pub peptide_input: String,

    /// Parsed peptide (None while the input is empty or invalid).
    pub peptide: Option<PeptideSpec>,

    /// Matrices that loaded, in file-name order.
    pub files: Vec<LoadedFile>,

    /// Files that failed to load: (file id, reason).
    pub load_errors: Vec<(String, String)>,

    /// Index into `files` of the file being plotted.
    pub selected_file: Option<usize>,

    /// 1-based peptide residues whose traces are drawn.
    pub residues: BTreeSet<usize>,

    /// Row (standard) or column (reciprocal) traces.
    pub direction: Direction,

    pub palette: ResiduePalette,

    /// Minima and combined tables for the current folder + peptide.
    pub report: Option<BatchReport>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            folder: None,
            peptide_input: String::new(),
            peptide: None,
            files: Vec::new(),
            load_errors: Vec::new(),
            selected_file: None,
            residues: BTreeSet::new(),
            direction: Direction::Forward,
            palette: ResiduePalette::default(),
            report: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// Seed the viewer from the command line.
    pub fn with_inputs(folder: Option<PathBuf>, peptide: Option<String>, residues: &[usize]) -> Self {
        let mut state = AppState {
            residues: residues.iter().copied().collect(),
            ..Default::default()
        };
        if let Some(p) = peptide {
            state.peptide_input = p;
            state.apply_peptide();
        }
        if let Some(dir) = folder {
            state.open_folder(&dir);
        }
        state
    }

    /// Load every JSON matrix of `dir`, replacing what was shown before.
    pub fn open_folder(&mut self, dir: &Path) {
        let paths = match discover::json_files(dir) {
            Ok(paths) => paths,
            Err(e) => {
                log::error!("Failed to open folder: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
                return;
            }
        };

        self.files.clear();
        self.load_errors.clear();
        for path in &paths {
            let file_id = discover::file_id(path);
            match load_file(path) {
                Ok(matrix) => self.files.push(LoadedFile { file_id, matrix }),
                Err(e) => {
                    log::error!("Error processing file {}: {e}", path.display());
                    self.load_errors.push((file_id, e.to_string()));
                }
            }
        }
        log::info!(
            "Loaded {} of {} JSON files from {}",
            self.files.len(),
            paths.len(),
            dir.display()
        );

        self.folder = Some(dir.to_path_buf());
        self.selected_file = if self.files.is_empty() { None } else { Some(0) };
        self.status_message = if paths.is_empty() {
            Some("No JSON files found in the specified folder.".to_string())
        } else {
            None
        };
        self.recompute();
    }

    /// Parse `peptide_input` and refresh everything that depends on it.
    pub fn apply_peptide(&mut self) {
        match PeptideSpec::new(&self.peptide_input) {
            Ok(peptide) => {
                let len = peptide.len();
                let (kept, dropped): (Vec<usize>, Vec<usize>) = self
                    .residues
                    .iter()
                    .partition(|&&r| r >= 1 && r <= len);
                if !dropped.is_empty() {
                    log::warn!("Residues {dropped:?} are outside peptide {peptide}; not plotted");
                }
                self.residues = kept.into_iter().collect();
                if self.residues.is_empty() {
                    self.residues = default_residues(&peptide).into_iter().collect();
                }
                self.palette = ResiduePalette::new(len);
                self.peptide = Some(peptide);
                self.status_message = None;
            }
            Err(e) => {
                self.peptide = None;
                self.status_message = Some(format!("Peptide: {e}"));
            }
        }
        self.recompute();
    }

    /// Rebuild minima and combined tables from the loaded matrices.
    pub fn recompute(&mut self) {
        self.report = self.peptide.as_ref().map(|peptide| {
            let mut batch = Batch::new(peptide.clone());
            for file in &self.files {
                batch.ingest_matrix(&file.file_id, Ok(file.matrix.clone()));
            }
            batch.finish()
        });
    }

    pub fn toggle_residue(&mut self, num: usize) {
        if !self.residues.remove(&num) {
            self.residues.insert(num);
        }
    }

    pub fn select_all_residues(&mut self) {
        if let Some(p) = &self.peptide {
            self.residues = (1..=p.len()).collect();
        }
    }

    pub fn select_no_residues(&mut self) {
        self.residues.clear();
    }

    pub fn selected(&self) -> Option<&LoadedFile> {
        self.selected_file.and_then(|i| self.files.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peptide_change_clamps_residues_and_recomputes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("m1.json"),
            r#"{"pae": [[0,1,2,3],[1,0,3,4],[2,3,0,5],[3,4,5,0]]}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("broken.json"), "{").unwrap();

        let mut state = AppState::with_inputs(
            Some(dir.path().to_path_buf()),
            Some("ab".into()),
            &[1, 2, 3],
        );
        assert_eq!(state.residues.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(state.files.len(), 1);
        assert_eq!(state.load_errors.len(), 1);
        assert_eq!(state.selected().map(|f| f.file_id.as_str()), Some("m1"));

        let report = state.report.as_ref().unwrap();
        assert_eq!(report.tables.forward.columns(), &["m1"]);

        state.peptide_input = "1".into();
        state.apply_peptide();
        assert!(state.peptide.is_none());
        assert!(state.report.is_none());
        assert!(state.status_message.is_some());
    }

    #[test]
    fn missing_residues_fall_back_to_trimmed_defaults() {
        let state = AppState::with_inputs(None, Some("ab".into()), &[]);
        assert_eq!(state.residues.iter().copied().collect::<Vec<_>>(), vec![1, 2]);

        let state = AppState::with_inputs(None, Some("mktay".into()), &[]);
        assert_eq!(state.residues.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn toggling_residues() {
        let mut state = AppState::default();
        state.toggle_residue(2);
        assert!(state.residues.contains(&2));
        state.toggle_residue(2);
        assert!(state.residues.is_empty());
    }
}
