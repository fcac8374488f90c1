//! Folder-level driver used by the command line: discover, process, export.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::batch::{Batch, BatchReport, BatchStatus};
use crate::config::RunConfig;
use crate::data::loader;
use crate::data::model::Direction;
use crate::discover;
use crate::export;

/// What a folder run produced on disk.
#[derive(Debug)]
pub struct RunOutcome {
    pub report: BatchReport,
    pub output_dir: PathBuf,
    pub per_file_outputs: Vec<PathBuf>,
    pub combined_outputs: Vec<PathBuf>,
}

/// Process every JSON file of `cfg.input_dir` in name order and write the
/// per-file and combined tables.
///
/// Per-file load or extraction failures are logged and skipped. Only I/O on
/// the input folder or the output folder aborts the run.
pub fn run(cfg: &RunConfig) -> Result<RunOutcome> {
    cfg.validate()?;
    if !cfg.input_dir.is_dir() {
        bail!("input folder {} does not exist", cfg.input_dir.display());
    }

    let files = discover::json_files(&cfg.input_dir)?;
    let output_dir = cfg.output_dir();
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating output folder {}", output_dir.display()))?;

    let mut batch = Batch::new(cfg.peptide.clone());
    let mut per_file_outputs = Vec::new();

    for path in &files {
        log::info!("Processing file: {}", path.display());
        let file_id = discover::file_id(path);
        let Some(summaries) = batch.ingest_matrix(&file_id, loader::load_file(path)) else {
            continue;
        };
        if cfg.write_per_file {
            for direction in Direction::ALL {
                let written =
                    export::write_summary(&output_dir, &file_id, summaries.get(direction), cfg.format)?;
                per_file_outputs.push(written);
            }
        }
    }

    let report = batch.finish();
    let mut combined_outputs = Vec::new();

    match report.status() {
        BatchStatus::NoFiles => {
            log::warn!("No JSON files found in the specified folder.");
        }
        BatchStatus::NoneSucceeded => {
            log::warn!(
                "None of the {} JSON files could be processed; combined tables not written",
                report.failures.len()
            );
        }
        status => {
            if status == BatchStatus::Partial {
                log::warn!(
                    "{} of {} files failed and are missing from the combined tables",
                    report.failures.len(),
                    report.files_seen()
                );
            }
            for direction in Direction::ALL {
                let path = export::write_combined(&output_dir, report.tables.get(direction), cfg.format)?;
                log::info!("Combined {direction} table saved as: {}", path.display());
                combined_outputs.push(path);
            }
            log::info!("All output files saved in: {}", output_dir.display());
        }
    }

    Ok(RunOutcome {
        report,
        output_dir,
        per_file_outputs,
        combined_outputs,
    })
}
