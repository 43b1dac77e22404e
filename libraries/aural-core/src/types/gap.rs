//! Silence inserted between tracks
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where a gap sits relative to its track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapPosition {
    /// Silence before the track starts
    BeforeTrack,
    /// Silence after the track ends
    AfterTrack,
}

/// Origin and lifetime of a gap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapKind {
    /// Derived from the global "gap between tracks" preference
    Implicit,

    /// Explicit playlist gap, removed from the playlist once applied
    OneTime,

    /// Explicit playlist gap that stays in place
    Persistent,
}

/// A period of silence before or after a track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gap {
    duration: Duration,
    position: GapPosition,
    kind: GapKind,
}

impl Gap {
    /// Create a gap. The duration must be non-zero.
    pub fn new(duration: Duration, position: GapPosition, kind: GapKind) -> Result<Self> {
        if duration.is_zero() {
            return Err(CoreError::invalid_input("gap duration must be non-zero"));
        }

        Ok(Self {
            duration,
            position,
            kind,
        })
    }

    /// Gap derived from playback preferences
    pub fn implicit(duration: Duration, position: GapPosition) -> Result<Self> {
        Self::new(duration, position, GapKind::Implicit)
    }

    /// Explicit gap consumed the first time it is applied
    pub fn one_time(duration: Duration, position: GapPosition) -> Result<Self> {
        Self::new(duration, position, GapKind::OneTime)
    }

    /// Explicit gap that persists across plays
    pub fn persistent(duration: Duration, position: GapPosition) -> Result<Self> {
        Self::new(duration, position, GapKind::Persistent)
    }

    /// Length of the silence
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Where the gap sits relative to its track
    pub fn position(&self) -> GapPosition {
        self.position
    }

    /// Origin of the gap
    pub fn kind(&self) -> GapKind {
        self.kind
    }

    /// Whether applying the gap consumes it
    pub fn is_one_time(&self) -> bool {
        self.kind == GapKind::OneTime
    }
}
