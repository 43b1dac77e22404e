//! Playback Events
//!
//! Two directions of event traffic:
//! - Notifications published by the chains to UI and sequencer observers
//! - Transcoding results delivered to the chains by the transcoder
//!
//! Pre-track-change notices are delivered synchronously so observers can act
//! (e.g. save per-track audio settings) before the player switches tracks.
//! Everything else is queued on subscriber channels.

use crate::error::PlaybackError;
use aural_core::{Gap, PlayerState, Track};
use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};

/// Sent to pre-track-change observers before the player changes track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreTrackChange {
    pub old_track: Option<Track>,
    pub old_state: PlayerState,
    pub new_track: Option<Track>,
    /// The old track was cut off rather than played to its end
    pub interrupted: bool,
}

/// Notifications delivered asynchronously to subscribers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlaybackNotification {
    /// Player moved from one track/state to another
    TrackTransitioned {
        previous_track: Option<Track>,
        previous_state: PlayerState,
        new_track: Option<Track>,
        new_state: PlayerState,
    },

    /// A playback request failed
    TrackNotPlayed {
        /// Track that was playing when the request was made
        track: Option<Track>,
        error: PlaybackError,
    },

    /// Gaps computed after a track completed
    GapsComputed {
        completed_track: Option<Track>,
        gaps: Vec<Gap>,
    },
}

/// Transcoder results, matched against deferred requests by track
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscodingEvent {
    Finished { track: Track, success: bool },
    Cancelled { track: Track },
}

type PreTrackChangeObserver = Box<dyn Fn(&PreTrackChange) + Send + Sync>;

/// Publish side of the playback notification bus
#[derive(Default)]
pub struct NotificationBus {
    subscribers: Mutex<Vec<Sender<PlaybackNotification>>>,
    pre_track_change_observers: Mutex<Vec<PreTrackChangeObserver>>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to asynchronous notifications
    ///
    /// Dropping the receiver unsubscribes on the next publish.
    pub fn subscribe(&self) -> Receiver<PlaybackNotification> {
        let (tx, rx) = unbounded();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    /// Register a synchronous pre-track-change observer
    ///
    /// Observers run on the publishing thread while the observer list is
    /// locked; they must not register further observers.
    pub fn on_pre_track_change(
        &self,
        observer: impl Fn(&PreTrackChange) + Send + Sync + 'static,
    ) {
        self.pre_track_change_observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(observer));
    }

    /// Queue `notification` for every live subscriber
    pub fn publish(&self, notification: PlaybackNotification) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| tx.send(notification.clone()).is_ok());
    }

    /// Run every pre-track-change observer before returning
    pub fn publish_pre_track_change(&self, notice: &PreTrackChange) {
        let observers = self
            .pre_track_change_observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for observer in observers.iter() {
            observer(notice);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl std::fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationBus")
            .field("subscribers", &self.subscriber_count())
            .finish_non_exhaustive()
    }
}
