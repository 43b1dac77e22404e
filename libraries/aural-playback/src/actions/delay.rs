//! Gap computation when a track completes

use crate::{
    chain::{ChainAction, ChainControl},
    config::SharedPreferences,
    context::RequestContext,
    services::{PlayQueue, Playlist},
};
use aural_core::{Gap, GapPosition};
use std::sync::{Arc, PoisonError};
use tracing::{debug, warn};

/// Adds the gap to leave after a completed track
///
/// An explicit playlist gap wins over the global preference. Never
/// terminates the chain.
pub struct DelayAfterTrackCompletionAction {
    playlist: Arc<dyn Playlist>,
    play_queue: Arc<dyn PlayQueue>,
    preferences: SharedPreferences,
}

impl DelayAfterTrackCompletionAction {
    pub fn new(
        playlist: Arc<dyn Playlist>,
        play_queue: Arc<dyn PlayQueue>,
        preferences: SharedPreferences,
    ) -> Self {
        Self {
            playlist,
            play_queue,
            preferences,
        }
    }

    fn gap_after(&self, context: &RequestContext) -> Option<Gap> {
        let completed = context.current_track()?;
        self.play_queue.peek_subsequent()?;

        if let Some(gap) = self.playlist.gap_after_track(completed) {
            if gap.is_one_time() {
                self.playlist
                    .remove_gap_for_track(completed, GapPosition::AfterTrack);
            }
            debug!(track = %completed.id, duration = ?gap.duration(), "Using explicit gap after track");
            return Some(gap);
        }

        let preferences = self
            .preferences
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        if !preferences.gap_between_tracks {
            return None;
        }

        match Gap::implicit(
            preferences.gap_between_tracks_duration(),
            GapPosition::AfterTrack,
        ) {
            Ok(gap) => Some(gap),
            Err(error) => {
                warn!(%error, "Ignoring invalid gap-between-tracks preference");
                None
            }
        }
    }
}

impl ChainAction for DelayAfterTrackCompletionAction {
    fn name(&self) -> &'static str {
        "delay_after_track_completion"
    }

    fn execute(&mut self, mut context: RequestContext, chain: &mut dyn ChainControl) {
        if let Some(gap) = self.gap_after(&context) {
            context.add_gap(gap);
        }
        chain.proceed(context);
    }
}
