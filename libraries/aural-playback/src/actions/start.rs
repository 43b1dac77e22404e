//! Terminal action of the start chain

use crate::{
    chain::{ChainAction, ChainControl},
    context::RequestContext,
    error::PlaybackError,
    events::{NotificationBus, PlaybackNotification, PreTrackChange},
    services::Player,
};
use aural_core::PlayerState;
use std::sync::Arc;
use tracing::{info, warn};

/// Starts playback of the requested track and completes the chain
pub struct StartPlaybackAction {
    player: Arc<dyn Player>,
    notifications: Arc<NotificationBus>,
}

impl StartPlaybackAction {
    pub fn new(player: Arc<dyn Player>, notifications: Arc<NotificationBus>) -> Self {
        Self {
            player,
            notifications,
        }
    }
}

impl ChainAction for StartPlaybackAction {
    fn name(&self) -> &'static str {
        "start_playback"
    }

    fn execute(&mut self, context: RequestContext, chain: &mut dyn ChainControl) {
        let Some(requested) = context.requested_track().cloned() else {
            warn!(request = %context.id(), "No requested track; cannot start playback");
            chain.terminate(context, PlaybackError::NoRequestedTrack);
            return;
        };

        // Observers must see this before the player switches tracks
        if context.is_track_change() {
            self.notifications.publish_pre_track_change(&PreTrackChange {
                old_track: context.current_track().cloned(),
                old_state: context.current_state(),
                new_track: Some(requested.clone()),
                interrupted: context.params().interrupting_playback,
            });
        }

        let params = context.params();
        info!(
            request = %context.id(),
            track = %requested.id,
            start = ?params.start_position,
            end = ?params.end_position,
            "Starting playback"
        );
        self.player
            .play(&requested, params.start_position, params.end_position);

        self.notifications
            .publish(PlaybackNotification::TrackTransitioned {
                previous_track: context.current_track().cloned(),
                previous_state: context.current_state(),
                new_track: Some(requested),
                new_state: PlayerState::Playing,
            });

        chain.complete(context);
    }
}
