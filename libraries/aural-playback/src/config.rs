//! Playback preferences

use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Preferences shared between the controller and the actions that read them
pub type SharedPreferences = Arc<RwLock<PlaybackPreferences>>;

/// User-facing playback preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackPreferences {
    /// Insert silence between consecutive tracks (default: false)
    pub gap_between_tracks: bool,

    /// Length of that silence in seconds (default: 5)
    pub gap_between_tracks_duration_secs: u32,
}

impl Default for PlaybackPreferences {
    fn default() -> Self {
        Self {
            gap_between_tracks: false,
            gap_between_tracks_duration_secs: 5,
        }
    }
}

impl PlaybackPreferences {
    /// Load preferences from an optional TOML file and the environment
    ///
    /// Environment variables use the `AURAL_` prefix, e.g.
    /// `AURAL_GAP_BETWEEN_TRACKS=true`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path.filter(|p| p.exists()) {
            settings = settings.add_source(config::File::from(path));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("AURAL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let preferences: Self = settings.build()?.try_deserialize()?;
        preferences.validate()?;
        Ok(preferences)
    }

    pub fn validate(&self) -> Result<()> {
        if self.gap_between_tracks && self.gap_between_tracks_duration_secs == 0 {
            return Err(PlaybackError::Config(
                "gap_between_tracks_duration_secs must be non-zero when gaps are enabled"
                    .to_string(),
            ));
        }
        Ok(())
    }

    pub fn gap_between_tracks_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.gap_between_tracks_duration_secs))
    }

    pub fn shared(self) -> SharedPreferences {
        Arc::new(RwLock::new(self))
    }
}
