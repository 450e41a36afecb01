use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Simple, file-backed personal task manager.
/// Storage defaults to ~/.tm/tasks.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "tm", version, about = "Personal task manager")]
pub struct Cli {
    /// Path to the JSON task file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
