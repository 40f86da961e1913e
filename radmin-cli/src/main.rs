//! radmin CLI tool

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use radmin_cli_lib::GenerateCommand;

#[derive(Parser)]
#[command(name = "radmin")]
#[command(version)]
#[command(about = "Generate a RedwoodJS admin panel from the Prisma schema", long_about = None)]
struct Cli {
    /// Path to the Redwood project that hosts the admin panel
    project_path: PathBuf,

    /// Only rewrite the admin stylesheet and its import
    #[arg(long)]
    css: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    radmin::observability::init();

    GenerateCommand::new(cli.project_path, cli.css).execute()
}
