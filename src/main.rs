use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use audiobook_meta::cli::commands::{Cli, Commands};
use audiobook_meta::{
    BookProcessor, Console, ConsolePrompter, DirectoryWalker, ProcessOutcome, SidecarMigrator,
};

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            root,
            multi,
            resume,
            jobs,
            language_roots,
        } => run(root, multi, resume, jobs, language_roots),
        Commands::Migrate { root, fill_missing } => migrate(root, fill_missing),
    }
}

fn run(root: PathBuf, multi: bool, resume: bool, jobs: usize, language_roots: Vec<String>) -> ExitCode {
    let Some(root) = validate_root(&root) else {
        return ExitCode::from(2);
    };

    // Configure thread pool
    let threads = if jobs == 0 { num_cpus::get() } else { jobs };
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .expect("Failed to initialize thread pool");

    println!("=== Audiobook running time scan ===");
    println!("Root directory: {}", root.display());
    println!("Resume mode: {}", resume);
    println!("Using {} worker threads", rayon::current_num_threads());
    println!();

    let console = Arc::new(Console::new());
    let roles = Arc::new(ConsolePrompter::new(Arc::clone(&console)));
    let processor = BookProcessor::new(Arc::clone(&console), roles, resume);

    if multi {
        let walker = DirectoryWalker::new(processor, Arc::clone(&console), language_roots);

        if let Err(e) = walker.walk(&root) {
            eprintln!("Error scanning '{}': {}", root.display(), e);
            return ExitCode::FAILURE;
        }

        let summary = walker.summary();
        println!("\n=== Scan complete ===");
        println!("Books written: {}", summary.written);
        println!("Books skipped (existing sidecar): {}", summary.skipped);
        println!("Folders without audio: {}", summary.empty);
        println!("Books failed: {}", summary.failed);

        if summary.failed > 0 {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    } else {
        match processor.process(&root) {
            Ok(ProcessOutcome::Written) => {
                println!("\n=== Book processed ===");
                ExitCode::SUCCESS
            }
            Ok(ProcessOutcome::SkippedExisting) => {
                println!("Sidecar already present, nothing to do.");
                ExitCode::SUCCESS
            }
            Ok(ProcessOutcome::NoAudio) => {
                println!("No audio files found in '{}'.", root.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error processing '{}': {}", root.display(), e);
                ExitCode::FAILURE
            }
        }
    }
}

fn migrate(root: PathBuf, fill_missing: bool) -> ExitCode {
    let Some(root) = validate_root(&root) else {
        return ExitCode::from(2);
    };

    println!("=== Sidecar schema migration ===");
    println!("Root directory: {}", root.display());
    println!();

    let console = Arc::new(Console::new());
    let roles = Arc::new(ConsolePrompter::new(Arc::clone(&console)));
    let migrator = SidecarMigrator::new(console, roles, fill_missing);

    let summary = migrator.migrate(&root);
    println!("\n=== Migration complete ===");
    println!("Files rewritten: {}", summary.rewritten);
    println!("Files failed: {}", summary.failed);

    if summary.failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn validate_root(root: &Path) -> Option<PathBuf> {
    // Try to get canonical path
    let root = fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());

    if !root.is_dir() {
        eprintln!("'{}' is not a valid directory.", root.display());
        return None;
    }

    Some(root)
}
