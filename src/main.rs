mod app;
mod cli;
mod color;
mod state;
mod ui;

use anyhow::Result;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "pae-minima",
    version = env!("CARGO_PKG_VERSION"),
    about = "Per-residue PAE minima for a folder of peptide–receptor predictions",
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: cli::Command,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    Cli::parse().command.execute()
}
