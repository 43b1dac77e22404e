//! Shared fakes for transition chain integration tests
#![allow(dead_code)]

use aural_core::{Gap, GapPosition, PlayerState, Track, TrackId};
use aural_playback::{
    NotificationBus, PlayQueue, PlaybackNotification, PlaybackPreferences, PlaybackServices,
    Player, Playlist, Preparation, Sequencer, TrackPreparationError, TrackPreparer, Transcoder,
    TranscodingEvent, TransitionController,
};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

pub fn track(id: &str) -> Track {
    Track::with_id(TrackId::new(id), id, PathBuf::from(format!("/music/{id}.flac")))
}

// ===== Player =====

#[derive(Debug, Clone, PartialEq)]
pub struct PlayCall {
    pub track: Track,
    pub start: Duration,
    pub end: Option<Duration>,
}

#[derive(Default)]
pub struct FakePlayer {
    state: Mutex<PlayerState>,
    track: Mutex<Option<Track>>,
    pub plays: Mutex<Vec<PlayCall>>,
    pub stops: AtomicUsize,
    pub transcoding_calls: Mutex<Vec<Track>>,
}

impl FakePlayer {
    pub fn set_state(&self, state: PlayerState) {
        *self.state.lock().unwrap() = state;
    }

    pub fn play_count(&self) -> usize {
        self.plays.lock().unwrap().len()
    }

    pub fn last_played(&self) -> Option<Track> {
        self.plays.lock().unwrap().last().map(|call| call.track.clone())
    }
}

impl Player for FakePlayer {
    fn play(&self, track: &Track, start_position: Duration, end_position: Option<Duration>) {
        self.plays.lock().unwrap().push(PlayCall {
            track: track.clone(),
            start: start_position,
            end: end_position,
        });
        *self.track.lock().unwrap() = Some(track.clone());
        self.set_state(PlayerState::Playing);
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        *self.track.lock().unwrap() = None;
        self.set_state(PlayerState::Stopped);
    }

    fn state(&self) -> PlayerState {
        *self.state.lock().unwrap()
    }

    fn playing_track(&self) -> Option<Track> {
        self.track.lock().unwrap().clone()
    }

    fn transcoding(&self, track: &Track) {
        self.transcoding_calls.lock().unwrap().push(track.clone());
        *self.track.lock().unwrap() = Some(track.clone());
        self.set_state(PlayerState::Transcoding);
    }
}

// ===== Sequencer =====

#[derive(Default)]
pub struct FakeSequencer {
    pub ends: AtomicUsize,
}

impl FakeSequencer {
    pub fn end_count(&self) -> usize {
        self.ends.load(Ordering::SeqCst)
    }
}

impl Sequencer for FakeSequencer {
    fn end(&self) {
        self.ends.fetch_add(1, Ordering::SeqCst);
    }
}

// ===== Transcoder =====

/// Records requests; tests decide when results are delivered
pub struct FakeTranscoder {
    events: Sender<TranscodingEvent>,
    pub requests: Mutex<Vec<Track>>,
    pub cancellations: Mutex<Vec<Track>>,
}

impl FakeTranscoder {
    pub fn new() -> (Self, Receiver<TranscodingEvent>) {
        let (tx, rx) = unbounded();
        (
            Self {
                events: tx,
                requests: Mutex::new(Vec::new()),
                cancellations: Mutex::new(Vec::new()),
            },
            rx,
        )
    }

    pub fn finish(&self, track: &Track, success: bool) {
        self.events
            .send(TranscodingEvent::Finished {
                track: track.clone(),
                success,
            })
            .unwrap();
    }

    pub fn report_cancelled(&self, track: &Track) {
        self.events
            .send(TranscodingEvent::Cancelled {
                track: track.clone(),
            })
            .unwrap();
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Transcoder for FakeTranscoder {
    fn transcode_immediately(&self, track: &Track) {
        self.requests.lock().unwrap().push(track.clone());
    }

    fn cancel(&self, track: &Track) {
        self.cancellations.lock().unwrap().push(track.clone());
    }
}

// ===== Preparer =====

/// Tracks are ready unless configured otherwise
#[derive(Default)]
pub struct FakePreparer {
    outcomes: Mutex<HashMap<TrackId, Result<Preparation, TrackPreparationError>>>,
}

impl FakePreparer {
    pub fn needs_transcoding(&self, track: &Track) {
        self.outcomes
            .lock()
            .unwrap()
            .insert(track.id.clone(), Ok(Preparation::NeedsTranscoding));
    }

    pub fn fails(&self, track: &Track, error: TrackPreparationError) {
        self.outcomes
            .lock()
            .unwrap()
            .insert(track.id.clone(), Err(error));
    }
}

impl TrackPreparer for FakePreparer {
    fn prepare(&self, track: &Track) -> Result<Preparation, TrackPreparationError> {
        self.outcomes
            .lock()
            .unwrap()
            .get(&track.id)
            .cloned()
            .unwrap_or(Ok(Preparation::Ready))
    }
}

// ===== Playlist / queue =====

#[derive(Default)]
pub struct FakePlaylist {
    gaps_after: Mutex<HashMap<TrackId, Gap>>,
}

impl FakePlaylist {
    pub fn set_gap_after(&self, track: &Track, gap: Gap) {
        self.gaps_after
            .lock()
            .unwrap()
            .insert(track.id.clone(), gap);
    }

    pub fn has_gap_after(&self, track: &Track) -> bool {
        self.gaps_after.lock().unwrap().contains_key(&track.id)
    }
}

impl Playlist for FakePlaylist {
    fn gap_after_track(&self, track: &Track) -> Option<Gap> {
        self.gaps_after.lock().unwrap().get(&track.id).cloned()
    }

    fn remove_gap_for_track(&self, track: &Track, position: GapPosition) {
        if position == GapPosition::AfterTrack {
            self.gaps_after.lock().unwrap().remove(&track.id);
        }
    }
}

#[derive(Default)]
pub struct FakeQueue {
    subsequent: Mutex<Option<Track>>,
}

impl FakeQueue {
    pub fn set_subsequent(&self, track: Option<Track>) {
        *self.subsequent.lock().unwrap() = track;
    }
}

impl PlayQueue for FakeQueue {
    fn peek_subsequent(&self) -> Option<Track> {
        self.subsequent.lock().unwrap().clone()
    }
}

// ===== Rig =====

/// A controller wired to fakes, plus handles to inspect them
pub struct Rig {
    pub controller: TransitionController,
    pub player: Arc<FakePlayer>,
    pub sequencer: Arc<FakeSequencer>,
    pub transcoder: Arc<FakeTranscoder>,
    pub preparer: Arc<FakePreparer>,
    pub playlist: Arc<FakePlaylist>,
    pub queue: Arc<FakeQueue>,
    pub bus: Arc<NotificationBus>,
    pub notifications: Receiver<PlaybackNotification>,
}

impl Rig {
    pub fn new() -> Self {
        Self::with_preferences(PlaybackPreferences::default())
    }

    pub fn with_preferences(preferences: PlaybackPreferences) -> Self {
        init_tracing();

        let player = Arc::new(FakePlayer::default());
        let sequencer = Arc::new(FakeSequencer::default());
        let (transcoder, events) = FakeTranscoder::new();
        let transcoder = Arc::new(transcoder);
        let preparer = Arc::new(FakePreparer::default());
        let playlist = Arc::new(FakePlaylist::default());
        let queue = Arc::new(FakeQueue::default());
        let bus = Arc::new(NotificationBus::new());
        let notifications = bus.subscribe();

        let services = PlaybackServices {
            player: player.clone(),
            sequencer: sequencer.clone(),
            transcoder: transcoder.clone(),
            preparer: preparer.clone(),
            playlist: playlist.clone(),
            play_queue: queue.clone(),
            notifications: Arc::clone(&bus),
            preferences: preferences.shared(),
        };

        Self {
            controller: TransitionController::new(services, events),
            player,
            sequencer,
            transcoder,
            preparer,
            playlist,
            queue,
            bus,
            notifications,
        }
    }

    /// Drain everything published so far
    pub fn published(&self) -> Vec<PlaybackNotification> {
        self.notifications.try_iter().collect()
    }
}
