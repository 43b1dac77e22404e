//! Error types for playback transitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Reasons a track could not be prepared for playback
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum TrackPreparationError {
    /// Track file is missing
    #[error("File not found: {0:?}")]
    FileNotFound(PathBuf),

    /// Track is DRM protected
    #[error("Track is DRM protected")]
    DrmProtected,

    /// File contains no audio track
    #[error("No audio track found")]
    NoAudioTrack,

    /// File could not be decoded
    #[error("Track is not playable: {0}")]
    Unplayable(String),
}

/// Playback errors
///
/// Cloned into every `TrackNotPlayed` notification, so variants only carry
/// owned, cloneable data.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum PlaybackError {
    /// Requested track could not be prepared
    #[error("Track preparation failed: {0}")]
    Preparation(#[from] TrackPreparationError),

    /// Request reached playback without a track to play
    #[error("Invalid request: no requested track")]
    NoRequestedTrack,

    /// Preferences could not be loaded or are invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Domain type validation error
    #[error("{0}")]
    Core(String),
}

impl From<aural_core::CoreError> for PlaybackError {
    fn from(err: aural_core::CoreError) -> Self {
        Self::Core(err.to_string())
    }
}

impl From<config::ConfigError> for PlaybackError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
