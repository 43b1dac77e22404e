//! Core types for playback requests

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Parameters of a single playback request
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlaybackParams {
    /// Position to start playback from (default: start of track)
    pub start_position: Duration,

    /// Position to stop playback at (default: end of track)
    pub end_position: Option<Duration>,

    /// Whether the request replaces a track that is still playing
    pub interrupting_playback: bool,
}

impl PlaybackParams {
    /// Play the given segment of a track
    pub fn segment(start_position: Duration, end_position: Option<Duration>) -> Self {
        Self {
            start_position,
            end_position,
            ..Self::default()
        }
    }

    /// Mark the request as interrupting current playback
    #[must_use]
    pub fn interrupting(mut self) -> Self {
        self.interrupting_playback = true;
        self
    }
}
