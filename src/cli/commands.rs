use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "audiobook-meta")]
#[command(version)]
#[command(about = "Computes audiobook running times and writes metadata sidecar files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan audiobook folders and write one sidecar file per book
    Run {
        /// Book folder, or library root with --multi
        root: PathBuf,

        /// Treat ROOT as a library containing many books
        #[arg(short = 'm', long)]
        multi: bool,

        /// Skip books whose sidecar file already exists
        #[arg(short = 'r', long)]
        resume: bool,

        /// Number of worker threads (0 = all CPU cores)
        #[arg(short = 'j', long, default_value_t = 4)]
        jobs: usize,

        /// Additional organizational folder names that are always recursed
        /// into and never treated as books
        #[arg(long = "language-root", value_name = "NAME")]
        language_roots: Vec<String>,
    },

    /// Rewrite existing sidecar files into the current schema
    Migrate {
        /// Library root to scan for sidecar files
        root: PathBuf,

        /// Prompt for author/narrator names missing from migrated records
        #[arg(long)]
        fill_missing: bool,
    },
}
