//! Cancels an in-flight transcode that a new request makes obsolete

use crate::{
    chain::{ChainAction, ChainControl},
    context::RequestContext,
    services::{Player, Transcoder},
};
use aural_core::PlayerState;
use std::sync::Arc;
use tracing::debug;

pub struct CancelTranscodingAction {
    player: Arc<dyn Player>,
    transcoder: Arc<dyn Transcoder>,
}

impl CancelTranscodingAction {
    pub fn new(player: Arc<dyn Player>, transcoder: Arc<dyn Transcoder>) -> Self {
        Self { player, transcoder }
    }
}

impl ChainAction for CancelTranscodingAction {
    fn name(&self) -> &'static str {
        "cancel_transcoding"
    }

    fn execute(&mut self, context: RequestContext, chain: &mut dyn ChainControl) {
        // Re-requesting the track being transcoded keeps the transcode going
        if self.player.state() == PlayerState::Transcoding && context.is_track_change() {
            if let Some(track) = context.current_track() {
                debug!(request = %context.id(), track = %track.id, "Cancelling obsolete transcode");
                self.transcoder.cancel(track);
            }
        }
        chain.proceed(context);
    }
}
