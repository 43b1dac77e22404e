//! Transition controller - builds requests and routes them to chains
//!
//! Owns the start, stop and track-completed chains. Each trigger snapshots
//! the player into a fresh [`RequestContext`] and runs the matching chain.

use crate::{
    actions::{
        AudioFilePreparationAction, CancelTranscodingAction, DelayAfterTrackCompletionAction,
        HaltPlaybackAction, StartPlaybackAction,
    },
    chain::{ChainKind, ChainOutcome, PlaybackChain},
    config::SharedPreferences,
    context::{RequestContext, RequestTracker},
    events::{NotificationBus, TranscodingEvent},
    services::{PlayQueue, Player, Playlist, Sequencer, TrackPreparer, Transcoder},
    types::PlaybackParams,
};
use aural_core::Track;
use crossbeam_channel::Receiver;
use std::sync::Arc;

/// Everything the chains call into
#[derive(Clone)]
pub struct PlaybackServices {
    pub player: Arc<dyn Player>,
    pub sequencer: Arc<dyn Sequencer>,
    pub transcoder: Arc<dyn Transcoder>,
    pub preparer: Arc<dyn TrackPreparer>,
    pub playlist: Arc<dyn Playlist>,
    pub play_queue: Arc<dyn PlayQueue>,
    pub notifications: Arc<NotificationBus>,
    pub preferences: SharedPreferences,
}

pub struct TransitionController {
    player: Arc<dyn Player>,
    play_queue: Arc<dyn PlayQueue>,
    tracker: Arc<RequestTracker>,
    start: PlaybackChain,
    stop: PlaybackChain,
    completed: PlaybackChain,
}

impl TransitionController {
    /// Build the chains. `transcoding_events` is the receiving end of the
    /// channel the transcoder reports results on.
    pub fn new(services: PlaybackServices, transcoding_events: Receiver<TranscodingEvent>) -> Self {
        let tracker = Arc::new(RequestTracker::new());
        let chain = |kind| {
            PlaybackChain::new(
                kind,
                Arc::clone(&services.sequencer),
                Arc::clone(&services.notifications),
                Arc::clone(&tracker),
            )
        };

        let start = chain(ChainKind::StartPlayback)
            .with_action(CancelTranscodingAction::new(
                Arc::clone(&services.player),
                Arc::clone(&services.transcoder),
            ))
            .with_action(HaltPlaybackAction::new(Arc::clone(&services.player)))
            .with_action(AudioFilePreparationAction::new(
                Arc::clone(&services.player),
                Arc::clone(&services.preparer),
                Arc::clone(&services.transcoder),
                transcoding_events,
            ))
            .with_action(StartPlaybackAction::new(
                Arc::clone(&services.player),
                Arc::clone(&services.notifications),
            ));

        let stop = chain(ChainKind::StopPlayback)
            .with_action(CancelTranscodingAction::new(
                Arc::clone(&services.player),
                Arc::clone(&services.transcoder),
            ))
            .with_action(HaltPlaybackAction::new(Arc::clone(&services.player)));

        let completed = chain(ChainKind::TrackCompleted).with_action(
            DelayAfterTrackCompletionAction::new(
                Arc::clone(&services.playlist),
                Arc::clone(&services.play_queue),
                Arc::clone(&services.preferences),
            ),
        );

        Self {
            player: services.player,
            play_queue: services.play_queue,
            tracker,
            start,
            stop,
            completed,
        }
    }

    /// Play `track`, replacing whatever is playing or pending
    ///
    /// The request is marked interrupting when the player still holds a track.
    pub fn play(&mut self, track: Track, params: PlaybackParams) -> ChainOutcome {
        let params = if self.player.state().has_track() {
            params.interrupting()
        } else {
            params
        };
        let context = self.request(Some(track), params);
        self.start.execute(context)
    }

    /// Stop playback and abandon any pending request
    pub fn stop(&mut self) -> ChainOutcome {
        let context = self.request(None, PlaybackParams::default());
        self.stop.execute(context)
    }

    /// The playing track reached its end; compute the gap before the next one
    pub fn track_completed(&mut self) -> ChainOutcome {
        let subsequent = self.play_queue.peek_subsequent();
        let context = self.request(subsequent, PlaybackParams::default());
        self.completed.execute(context)
    }

    /// Deliver pending transcoding events to deferred requests
    pub fn process_events(&mut self) -> Vec<ChainOutcome> {
        self.start.pump()
    }

    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }

    fn request(&self, requested: Option<Track>, params: PlaybackParams) -> RequestContext {
        RequestContext::new(
            self.player.state(),
            self.player.playing_track(),
            requested,
            params,
        )
    }
}
