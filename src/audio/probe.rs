use std::path::Path;
use std::time::Duration;

use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::{MetadataOptions, MetadataRevision, StandardTagKey};
use symphonia::core::probe::{Hint, ProbeResult};

use crate::{BookError, Result};

/// Raw tag fields of one audio file, before any book-level mapping.
#[derive(Debug, Clone, Default)]
pub struct TrackTags {
    pub album: Option<String>,
    pub album_artists: Vec<String>,
    pub artists: Vec<String>,
    pub genres: Vec<String>,
    pub comment: Option<String>,
    pub subtitle_lines: Vec<String>,
}

fn probe(path: &Path) -> Result<ProbeResult> {
    let file = std::fs::File::open(path)?;

    // Create media source stream
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    // Create hint to help with format detection
    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| BookError::Probe(format!("{}: {}", path.display(), e)))
}

pub fn track_duration(path: &Path) -> Result<Duration> {
    let probed = probe(path)?;

    let track = probed
        .format
        .default_track()
        .ok_or_else(|| BookError::Probe(format!("no audio track in '{}'", path.display())))?;

    let params = &track.codec_params;

    match (params.time_base, params.n_frames) {
        (Some(time_base), Some(n_frames)) => {
            let time = time_base.calc_time(n_frames);
            Ok(Duration::from_secs(time.seconds) + Duration::from_secs_f64(time.frac))
        }
        _ => Err(BookError::Probe(format!(
            "could not determine duration of '{}'",
            path.display()
        ))),
    }
}

pub fn read_tags(path: &Path) -> Result<TrackTags> {
    let mut probed = probe(path)?;

    let mut tags = TrackTags::default();

    // Prefer metadata provided by the container format over tags found
    // during the probe operation (ID3v2 on mp3 surfaces in the latter).
    if let Some(revision) = probed.format.metadata().current() {
        collect_tags(revision, &mut tags);
    } else if let Some(revision) = probed.metadata.get().as_ref().and_then(|m| m.current()) {
        collect_tags(revision, &mut tags);
    } else {
        log::debug!("no tag metadata in '{}'", path.display());
    }

    Ok(tags)
}

fn collect_tags(revision: &MetadataRevision, out: &mut TrackTags) {
    for tag in revision.tags() {
        match tag.std_key {
            Some(StandardTagKey::Album) => {
                if out.album.is_none() {
                    out.album = Some(tag.value.to_string());
                }
            }
            Some(StandardTagKey::AlbumArtist) => {
                out.album_artists.extend(split_values(&tag.value.to_string()));
            }
            Some(StandardTagKey::Artist) => {
                out.artists.extend(split_values(&tag.value.to_string()));
            }
            Some(StandardTagKey::Genre) => {
                out.genres.extend(split_values(&tag.value.to_string()));
            }
            Some(StandardTagKey::Comment) => {
                if out.comment.is_none() {
                    out.comment = Some(tag.value.to_string());
                }
            }
            Some(StandardTagKey::TrackSubtitle) => {
                out.subtitle_lines.extend(
                    tag.value
                        .to_string()
                        .split('\0')
                        .map(str::trim)
                        .filter(|line| !line.is_empty())
                        .map(String::from),
                );
            }
            _ => {}
        }
    }
}

// Multi-valued frames arrive either as separate tags or as one value with
// embedded separators.
fn split_values(raw: &str) -> Vec<String> {
    raw.split(['\0', ';'])
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(String::from)
        .collect()
}
