//! Track type
use super::ids::TrackId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// A playable track
///
/// Two tracks are the same track when their ids match; the remaining fields
/// are display metadata and may lag behind the file on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// File path for audio decoding
    pub path: PathBuf,

    /// Track title
    pub title: String,

    /// Artist name (optional)
    pub artist: Option<String>,

    /// Track duration, if known
    pub duration: Option<Duration>,
}

impl Track {
    /// Create a track with a freshly generated id
    pub fn new(title: impl Into<String>, path: PathBuf) -> Self {
        Self::with_id(TrackId::generate(), title, path)
    }

    /// Create a track with a known id
    pub fn with_id(id: TrackId, title: impl Into<String>, path: PathBuf) -> Self {
        Self {
            id,
            path,
            title: title.into(),
            artist: None,
            duration: None,
        }
    }

    /// Whether `other` refers to the same track
    pub fn is_same(&self, other: &Track) -> bool {
        self.id == other.id
    }
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.is_same(other)
    }
}

impl Eq for Track {}
