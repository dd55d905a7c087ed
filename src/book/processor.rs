use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::audio::probe;
use crate::book::duration::DurationAggregator;
use crate::book::metadata::{BookMetadata, MetadataExtractor};
use crate::book::roles::{BookRole, RoleResolver};
use crate::utils::console::Console;
use crate::utils::sidecar;
use crate::{AudioBookRecord, BookError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    Written,
    SkippedExisting,
    NoAudio,
}

/// Orchestrates one book: resume check, duration aggregation, metadata
/// extraction, role disambiguation, sidecar emission.
pub struct BookProcessor {
    console: Arc<Console>,
    aggregator: DurationAggregator,
    roles: Arc<dyn RoleResolver>,
    resume: bool,
}

impl BookProcessor {
    pub fn new(console: Arc<Console>, roles: Arc<dyn RoleResolver>, resume: bool) -> Self {
        Self {
            aggregator: DurationAggregator::new(Arc::clone(&console)),
            console,
            roles,
            resume,
        }
    }

    pub fn process(&self, folder: &Path) -> Result<ProcessOutcome> {
        let name = folder_name(folder)?;
        let sidecar_path = folder.join(format!("{}.xml", name));

        // An existing sidecar is taken as proof of prior completion.
        if self.resume && sidecar_path.exists() {
            log::debug!("sidecar already present for '{}'", name);
            return Ok(ProcessOutcome::SkippedExisting);
        }

        self.console.line(&format!("Processing '{}'.", name));

        let tracks = collect_tracks(folder);
        if tracks.is_empty() {
            log::debug!("no audio files in '{}'", folder.display());
            return Ok(ProcessOutcome::NoAudio);
        }

        let running_time = self.aggregator.aggregate(&tracks)?;

        let tags = probe::read_tags(&tracks[0])?;
        let mut metadata = MetadataExtractor::extract(&tags);
        self.resolve_role_collision(&mut metadata, &name)?;

        let record = AudioBookRecord {
            title: metadata.title,
            authors: metadata.authors,
            narrators: metadata.narrators,
            genres: metadata.genres,
            description: metadata.description,
            running_time,
        };

        sidecar::write(&sidecar_path, &record)?;
        self.console.line(&format!(
            "Wrote '{}' ({}).",
            sidecar_path.display(),
            record.running_time
        ));

        Ok(ProcessOutcome::Written)
    }

    // Single-performer books are often tagged with the same name as both
    // album artist and performer; only a human can tell which role holds.
    fn resolve_role_collision(&self, metadata: &mut BookMetadata, fallback_title: &str) -> Result<()> {
        let person = match (metadata.authors.first(), metadata.narrators.first()) {
            (Some(author), Some(narrator)) if author == narrator => author.clone(),
            _ => return Ok(()),
        };

        let title = metadata.title.as_deref().unwrap_or(fallback_title).to_string();

        match self.roles.resolve_role(&title, &person)? {
            BookRole::Author => metadata.narrators.clear(),
            BookRole::Narrator => metadata.authors.clear(),
            BookRole::Both | BookRole::Undefined => {}
        }

        Ok(())
    }
}

fn folder_name(folder: &Path) -> Result<String> {
    folder
        .file_name()
        .and_then(|n| n.to_str())
        .map(String::from)
        .ok_or_else(|| BookError::InvalidFolder(folder.display().to_string()))
}

fn collect_tracks(folder: &Path) -> Vec<PathBuf> {
    let mut tracks: Vec<PathBuf> = walkdir::WalkDir::new(folder)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::warn!("skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|e| e.file_type().is_file() && is_audio_file(e.path()))
        .map(|e| e.into_path())
        .collect();

    // Full-path order defines the track sequence and the lead track.
    tracks.sort();
    tracks
}

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            matches!(
                ext.to_ascii_lowercase().as_str(),
                "aac" | "flac" | "m4a" | "m4b" | "mp3" | "ogg" | "wav"
            )
        })
        .unwrap_or(false)
}
