use crate::audio::probe::TrackTags;

/// Descriptive fields of one book, mapped from the lead track's tags.
/// Every field is optional; missing tags yield empty values, never errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookMetadata {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub narrators: Vec<String>,
    pub genres: Vec<String>,
    pub description: Option<String>,
}

type DescriptionSource = fn(&TrackTags) -> Option<String>;

// Ordered fallback chain; the first source yielding text wins. New tag
// conventions slot in here without touching the existing ones.
const DESCRIPTION_SOURCES: &[DescriptionSource] = &[subtitle_block, comment_field];

// The subtitle/content-group text block is the canonical description
// location for this tagging convention.
fn subtitle_block(tags: &TrackTags) -> Option<String> {
    if tags.subtitle_lines.is_empty() {
        None
    } else {
        Some(tags.subtitle_lines.join("\n"))
    }
}

fn comment_field(tags: &TrackTags) -> Option<String> {
    tags.comment.clone()
}

pub struct MetadataExtractor;

impl MetadataExtractor {
    pub fn extract(tags: &TrackTags) -> BookMetadata {
        BookMetadata {
            title: tags.album.clone(),
            authors: tags.album_artists.clone(),
            narrators: tags.artists.clone(),
            genres: tags.genres.clone(),
            description: Self::description(tags),
        }
    }

    fn description(tags: &TrackTags) -> Option<String> {
        DESCRIPTION_SOURCES
            .iter()
            .find_map(|source| source(tags))
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    }
}
