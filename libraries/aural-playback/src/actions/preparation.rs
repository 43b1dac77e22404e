//! Track preparation and the transcoding gate
//!
//! The only action that suspends a chain. When the requested track needs
//! transcoding the context is parked here until the transcoder reports back
//! on the event channel handed over at construction.

use crate::{
    chain::{ChainAction, ChainControl},
    context::RequestContext,
    error::PlaybackError,
    events::TranscodingEvent,
    services::{Player, Preparation, TrackPreparer, Transcoder},
};
use aural_core::{PlayerState, Track};
use crossbeam_channel::Receiver;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct AudioFilePreparationAction {
    player: Arc<dyn Player>,
    preparer: Arc<dyn TrackPreparer>,
    transcoder: Arc<dyn Transcoder>,
    events: Receiver<TranscodingEvent>,
    /// At most one parked request; a newer one replaces it
    deferred: Option<RequestContext>,
}

impl AudioFilePreparationAction {
    pub fn new(
        player: Arc<dyn Player>,
        preparer: Arc<dyn TrackPreparer>,
        transcoder: Arc<dyn Transcoder>,
        events: Receiver<TranscodingEvent>,
    ) -> Self {
        Self {
            player,
            preparer,
            transcoder,
            events,
            deferred: None,
        }
    }

    /// Request currently waiting on the transcoder
    pub fn deferred_context(&self) -> Option<&RequestContext> {
        self.deferred.as_ref()
    }

    fn defer(&mut self, context: RequestContext) {
        if let Some(abandoned) = self.deferred.replace(context) {
            debug!(request = %abandoned.id(), "Abandoning superseded deferred request");
        }
    }

    /// Returns the context to resume, if `event` releases one
    fn handle_event(
        &mut self,
        event: TranscodingEvent,
        chain: &dyn ChainControl,
    ) -> Option<RequestContext> {
        match event {
            TranscodingEvent::Finished { track, success } => {
                self.transcoding_finished(&track, success, chain)
            }
            TranscodingEvent::Cancelled { track } => {
                self.transcoding_cancelled(&track);
                None
            }
        }
    }

    fn transcoding_finished(
        &mut self,
        track: &Track,
        success: bool,
        chain: &dyn ChainControl,
    ) -> Option<RequestContext> {
        // Events for other tracks leave the parked request alone
        if !self.deferred.as_ref().is_some_and(|ctx| ctx.requests(track)) {
            debug!(track = %track.id, "Ignoring transcoding result for a track nobody is waiting on");
            return None;
        }

        let context = self.deferred.take()?;

        if self.player.state() == PlayerState::Waiting {
            debug!(request = %context.id(), "Player is waiting on a gap; dropping deferred request");
            return None;
        }

        // Failures are reported by the transcoder itself
        if !success {
            debug!(request = %context.id(), track = %track.id, "Transcoding failed; dropping deferred request");
            return None;
        }

        if !chain.is_current(&context) {
            debug!(request = %context.id(), "Deferred request was superseded; dropping it");
            return None;
        }

        info!(request = %context.id(), track = %track.id, "Transcoding finished; resuming playback");
        Some(context)
    }

    fn transcoding_cancelled(&mut self, track: &Track) {
        if self.deferred.as_ref().is_some_and(|ctx| ctx.requests(track)) {
            if let Some(context) = self.deferred.take() {
                debug!(request = %context.id(), track = %track.id, "Transcoding cancelled; abandoning deferred request");
            }
        }
    }
}

impl ChainAction for AudioFilePreparationAction {
    fn name(&self) -> &'static str {
        "audio_file_preparation"
    }

    fn execute(&mut self, context: RequestContext, chain: &mut dyn ChainControl) {
        let Some(track) = context.requested_track().cloned() else {
            // Start action reports the missing track
            chain.proceed(context);
            return;
        };

        match self.preparer.prepare(&track) {
            Err(error) => {
                warn!(request = %context.id(), track = %track.id, %error, "Track preparation failed");
                chain.terminate(context, PlaybackError::Preparation(error));
            }
            Ok(Preparation::NeedsTranscoding) => {
                info!(request = %context.id(), track = %track.id, "Track needs transcoding; deferring playback");
                self.transcoder.transcode_immediately(&track);
                self.player.transcoding(&track);
                self.defer(context);
            }
            Ok(Preparation::Ready) => chain.proceed(context),
        }
    }

    fn resume(&mut self, chain: &mut dyn ChainControl) {
        while let Ok(event) = self.events.try_recv() {
            if let Some(context) = self.handle_event(event, &*chain) {
                chain.proceed(context);
                return;
            }
        }
    }
}
