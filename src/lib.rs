use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod audio;
pub mod book;
pub mod cli;
pub mod migrate;
pub mod utils;

/// Total running time of one book, normalized so minutes and seconds stay
/// below 60. Hours are unbounded; whole days are folded into the hour count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningTime {
    #[serde(rename = "Hours")]
    pub hours: u16,
    #[serde(rename = "Minutes")]
    pub minutes: u16,
    #[serde(rename = "Seconds")]
    pub seconds: u16,
    #[serde(rename = "Value")]
    pub value: String,
}

impl RunningTime {
    pub fn new(hours: u16, minutes: u16, seconds: u16) -> Self {
        Self {
            hours,
            minutes,
            seconds,
            value: format!("{}:{:02}:{:02}", hours, minutes, seconds),
        }
    }

    /// Sub-second remainders of 500ms or more round the second count up.
    pub fn from_total(total: Duration) -> Self {
        let mut secs = total.as_secs();
        if total.subsec_millis() >= 500 {
            secs += 1;
        }

        let hours = secs / 3600;
        let minutes = (secs % 3600) / 60;
        let seconds = secs % 60;

        Self::new(hours as u16, minutes as u16, seconds as u16)
    }
}

impl fmt::Display for RunningTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioBookRecord {
    #[serde(rename = "Title", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "Author", default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    #[serde(rename = "Narrator", default, skip_serializing_if = "Vec::is_empty")]
    pub narrators: Vec<String>,
    #[serde(rename = "Genre", default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "RunningTime")]
    pub running_time: RunningTime,
}

#[derive(Debug, thiserror::Error)]
pub enum BookError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("audio probe error: {0}")]
    Probe(String),
    #[error("sidecar write error: {0}")]
    XmlWrite(#[from] quick_xml::SeError),
    #[error("sidecar read error: {0}")]
    XmlRead(#[from] quick_xml::DeError),
    #[error("invalid book folder: {0}")]
    InvalidFolder(String),
}

pub type Result<T> = std::result::Result<T, BookError>;

// Re-exports for convenience
pub use book::metadata::{BookMetadata, MetadataExtractor};
pub use book::processor::{BookProcessor, ProcessOutcome};
pub use book::roles::{BookRole, ConsolePrompter, RoleResolver, ScriptedRoles};
pub use book::walker::{DirectoryWalker, WalkSummary};
pub use migrate::{MigrateSummary, SidecarMigrator};
pub use utils::console::Console;
