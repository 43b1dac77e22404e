//! Stops the player before a new track is prepared, or for good

use crate::{
    chain::{ChainAction, ChainControl},
    context::RequestContext,
    services::Player,
};
use aural_core::PlayerState;
use std::sync::Arc;
use tracing::debug;

pub struct HaltPlaybackAction {
    player: Arc<dyn Player>,
}

impl HaltPlaybackAction {
    pub fn new(player: Arc<dyn Player>) -> Self {
        Self { player }
    }
}

impl ChainAction for HaltPlaybackAction {
    fn name(&self) -> &'static str {
        "halt_playback"
    }

    fn execute(&mut self, context: RequestContext, chain: &mut dyn ChainControl) {
        if self.player.state() != PlayerState::Stopped {
            debug!(request = %context.id(), "Halting player");
            self.player.stop();
        }
        chain.proceed(context);
    }
}
