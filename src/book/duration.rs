use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::audio::probe;
use crate::utils::console::Console;
use crate::{Result, RunningTime};

/// Sums per-track durations of one book. Tracks are visited in the order
/// given (path order); the order only affects log output, not the sum.
pub struct DurationAggregator {
    console: Arc<Console>,
}

impl DurationAggregator {
    pub fn new(console: Arc<Console>) -> Self {
        Self { console }
    }

    pub fn aggregate(&self, tracks: &[PathBuf]) -> Result<RunningTime> {
        let mut total = Duration::ZERO;

        for track in tracks {
            if let Some(name) = track.file_name().and_then(|n| n.to_str()) {
                self.console.line(&format!("Processing '{}'.", name));
            }

            total += probe::track_duration(track)?;
        }

        Ok(RunningTime::from_total(total))
    }
}
