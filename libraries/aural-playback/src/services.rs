//! Capabilities the transition chains call into
//!
//! The chains never own audio output, playlists or the transcoder. Platform
//! code implements these traits and hands them over as `Arc<dyn ...>`.
//! Implementations use interior mutability; every method takes `&self`.

use crate::error::TrackPreparationError;
use aural_core::{Gap, GapPosition, PlayerState, Track};
use std::time::Duration;

/// Audio player
#[cfg_attr(test, mockall::automock)]
pub trait Player: Send + Sync {
    /// Begin playback of `track` between the given positions
    fn play(&self, track: &Track, start_position: Duration, end_position: Option<Duration>);

    fn stop(&self);

    fn state(&self) -> PlayerState;

    /// Track loaded in the player (or awaiting transcode), if any
    fn playing_track(&self) -> Option<Track>;

    /// Enter the waiting-for-transcode state for `track`
    fn transcoding(&self, track: &Track);
}

/// Playback sequencer
#[cfg_attr(test, mockall::automock)]
pub trait Sequencer: Send + Sync {
    /// End the playback sequence
    fn end(&self);
}

/// Format transcoder
///
/// Requests are fire-and-forget. Results come back as
/// [`TranscodingEvent`](crate::events::TranscodingEvent)s on the channel the
/// preparation action listens to.
#[cfg_attr(test, mockall::automock)]
pub trait Transcoder: Send + Sync {
    /// Transcode `track` ahead of anything else in the transcoder's queue
    fn transcode_immediately(&self, track: &Track);

    /// Abandon an in-flight transcode of `track`
    fn cancel(&self, track: &Track);
}

/// Playlist gap registry
#[cfg_attr(test, mockall::automock)]
pub trait Playlist: Send + Sync {
    /// Explicit gap registered after `track`
    fn gap_after_track(&self, track: &Track) -> Option<Gap>;

    fn remove_gap_for_track(&self, track: &Track, position: GapPosition);
}

/// Play queue
#[cfg_attr(test, mockall::automock)]
pub trait PlayQueue: Send + Sync {
    /// Track that will play after the current one, without advancing
    fn peek_subsequent(&self) -> Option<Track>;
}

/// Outcome of a successful track preparation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preparation {
    /// Track can be decoded as is
    Ready,

    /// Track format must be transcoded before it can be decoded
    NeedsTranscoding,
}

/// Reads track metadata and decides whether it can be played
#[cfg_attr(test, mockall::automock)]
pub trait TrackPreparer: Send + Sync {
    fn prepare(&self, track: &Track) -> Result<Preparation, TrackPreparationError>;
}
