//! Subcommands of the `pae-minima` binary.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use eframe::egui;

use pae_minima::batch::BatchStatus;
use pae_minima::config::{ExportFormat, RunConfig};
use pae_minima::data::model::Direction;
use pae_minima::export;

use crate::app::PaeViewerApp;
use crate::state::AppState;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract per-residue PAE minima from every JSON file in a folder and write combined tables.
    Run(RunCmd),
    /// Browse PAE traces and combined minima interactively.
    View(ViewCmd),
}

impl Command {
    pub fn execute(self) -> Result<()> {
        match self {
            Command::Run(cmd) => run(cmd),
            Command::View(cmd) => view(cmd),
        }
    }
}

#[derive(Debug, Args)]
pub struct RunCmd {
    /// Folder containing AlphaFold JSON files to analyze.
    #[arg(value_name = "FOLDER")]
    pub folder: PathBuf,
    /// Amino-acid sequence of the N-terminal peptide.
    #[arg(value_name = "PEPTIDE")]
    pub peptide: String,
    /// Peptide residues to highlight (1-based); also used in the output folder
    /// name. Defaults to 1 2 3, cut to the peptide length.
    #[arg(value_name = "RESIDUES")]
    pub residues: Vec<usize>,
    /// Parent folder for outputs (defaults to FOLDER).
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
    /// Table format.
    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    pub format: ExportFormat,
    /// Only write the combined tables.
    #[arg(long)]
    pub no_per_file: bool,
    /// Print the combined tables to stdout.
    #[arg(long)]
    pub print: bool,
}

#[derive(Debug, Args)]
pub struct ViewCmd {
    /// Folder to open on start-up.
    #[arg(value_name = "FOLDER")]
    pub folder: Option<PathBuf>,
    /// Amino-acid sequence of the N-terminal peptide.
    #[arg(long)]
    pub peptide: Option<String>,
    /// Peptide residues to plot (1-based). Defaults to 1,2,3 cut to the peptide length.
    #[arg(long, value_delimiter = ',')]
    pub residues: Vec<usize>,
}

impl RunCmd {
    fn into_config(self) -> Result<RunConfig> {
        let mut cfg = RunConfig::new(&self.folder, &self.peptide).context("invalid peptide")?;
        if !self.residues.is_empty() {
            cfg.residues = self.residues;
        }
        cfg.output_root = self.out_dir;
        cfg.format = self.format;
        cfg.write_per_file = !self.no_per_file;
        cfg.print_tables = self.print;
        Ok(cfg)
    }
}

fn run(cmd: RunCmd) -> Result<()> {
    let cfg = cmd.into_config()?;
    let outcome = pae_minima::run::run(&cfg)?;
    let report = &outcome.report;

    if cfg.print_tables && report.status().has_results() {
        for direction in Direction::ALL {
            println!("{direction} minima");
            println!("{}", export::pretty_table(report.tables.get(direction))?);
        }
    }

    match report.status() {
        BatchStatus::NoFiles => println!("No JSON files found in the specified folder."),
        status => {
            println!(
                "{} of {} files processed; outputs in {}",
                report.processed.len(),
                report.files_seen(),
                outcome.output_dir.display()
            );
            for failure in &report.failures {
                println!("  skipped {failure}");
            }
            if status == BatchStatus::NoneSucceeded {
                println!("No combined tables written.");
            }
        }
    }
    Ok(())
}

fn view(cmd: ViewCmd) -> Result<()> {
    let state = AppState::with_inputs(cmd.folder, cmd.peptide, &cmd.residues);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "PAE Minima – Trace Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(PaeViewerApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}
