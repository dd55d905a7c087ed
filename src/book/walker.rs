use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::book::processor::{BookProcessor, ProcessOutcome};
use crate::utils::console::Console;
use crate::Result;

// Organizational buckets whose children are never books themselves.
pub const DEFAULT_LANGUAGE_ROOTS: &[&str] = &["English", "Deutsch"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    pub written: usize,
    pub skipped: usize,
    pub empty: usize,
    pub failed: usize,
}

/// Discovers book folders under a root and fans them out to the processor.
/// All recursion and book work runs on the global worker pool, so the pool
/// size is a true concurrency ceiling for the whole tree.
pub struct DirectoryWalker {
    processor: BookProcessor,
    console: Arc<Console>,
    language_roots: Vec<String>,
    written: AtomicUsize,
    skipped: AtomicUsize,
    empty: AtomicUsize,
    failed: AtomicUsize,
}

impl DirectoryWalker {
    pub fn new(processor: BookProcessor, console: Arc<Console>, extra_roots: Vec<String>) -> Self {
        let mut language_roots: Vec<String> =
            DEFAULT_LANGUAGE_ROOTS.iter().map(ToString::to_string).collect();
        language_roots.extend(extra_roots);

        Self {
            processor,
            console,
            language_roots,
            written: AtomicUsize::new(0),
            skipped: AtomicUsize::new(0),
            empty: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        }
    }

    pub fn walk(&self, root: &Path) -> Result<()> {
        let subdirs = subdirectories(root)?;

        // Children of a language root are organizational, never books.
        let recurse_all = self.is_language_root(root);

        subdirs.par_iter().for_each(|dir| {
            if recurse_all || has_subdirectories(dir) {
                if let Err(e) = self.walk(dir) {
                    self.console
                        .error(&format!("Error scanning '{}': {}", dir.display(), e));
                    self.failed.fetch_add(1, Ordering::SeqCst);
                }
            } else {
                self.process_book(dir);
            }
        });

        Ok(())
    }

    // Failures stay contained to the one book; siblings keep going.
    fn process_book(&self, folder: &Path) {
        match self.processor.process(folder) {
            Ok(ProcessOutcome::Written) => {
                self.written.fetch_add(1, Ordering::SeqCst);
            }
            Ok(ProcessOutcome::SkippedExisting) => {
                self.skipped.fetch_add(1, Ordering::SeqCst);
            }
            Ok(ProcessOutcome::NoAudio) => {
                self.empty.fetch_add(1, Ordering::SeqCst);
            }
            Err(e) => {
                self.console
                    .error(&format!("Error processing '{}': {}", folder.display(), e));
                self.failed.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn is_language_root(&self, dir: &Path) -> bool {
        dir.file_name()
            .and_then(|n| n.to_str())
            .map(|name| self.language_roots.iter().any(|root| root == name))
            .unwrap_or(false)
    }

    pub fn summary(&self) -> WalkSummary {
        WalkSummary {
            written: self.written.load(Ordering::SeqCst),
            skipped: self.skipped.load(Ordering::SeqCst),
            empty: self.empty.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
        }
    }
}

fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut subdirs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|entry| entry.path())
        .collect();

    subdirs.sort();
    Ok(subdirs)
}

fn has_subdirectories(dir: &Path) -> bool {
    fs::read_dir(dir)
        .map(|mut entries| {
            entries.any(|entry| {
                entry
                    .map(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
                    .unwrap_or(false)
            })
        })
        .unwrap_or(false)
}
