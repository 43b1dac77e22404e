//! Request context shared by the actions of one chain run

use crate::types::PlaybackParams;
use aural_core::{Gap, PlayerState, Track};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a playback request
///
/// Ids increase monotonically for the life of the process. Two contexts are
/// the same request only if their ids match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    /// Allocate the next request id
    pub fn next() -> Self {
        Self(NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// State of one playback request as it moves through a chain
///
/// Everything except the gap list is fixed at construction.
#[derive(Debug)]
pub struct RequestContext {
    id: RequestId,
    current_state: PlayerState,
    current_track: Option<Track>,
    requested_track: Option<Track>,
    params: PlaybackParams,
    gaps: Vec<Gap>,
}

impl RequestContext {
    pub fn new(
        current_state: PlayerState,
        current_track: Option<Track>,
        requested_track: Option<Track>,
        params: PlaybackParams,
    ) -> Self {
        Self {
            id: RequestId::next(),
            current_state,
            current_track,
            requested_track,
            params,
            gaps: Vec::new(),
        }
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Player state when the request was made
    pub fn current_state(&self) -> PlayerState {
        self.current_state
    }

    /// Track playing (or just completed) when the request was made
    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    pub fn requested_track(&self) -> Option<&Track> {
        self.requested_track.as_ref()
    }

    pub fn params(&self) -> &PlaybackParams {
        &self.params
    }

    /// Whether the request switches to a different track
    pub fn is_track_change(&self) -> bool {
        match (&self.current_track, &self.requested_track) {
            (Some(current), Some(requested)) => !current.is_same(requested),
            (None, None) => false,
            _ => true,
        }
    }

    /// Whether `track` is the track this request wants to play
    pub fn requests(&self, track: &Track) -> bool {
        self.requested_track
            .as_ref()
            .is_some_and(|requested| requested.is_same(track))
    }

    /// Append a gap. Order of insertion is preserved.
    pub fn add_gap(&mut self, gap: Gap) {
        self.gaps.push(gap);
    }

    pub fn gaps(&self) -> &[Gap] {
        &self.gaps
    }

    pub fn total_gap(&self) -> Duration {
        self.gaps.iter().map(Gap::duration).sum()
    }
}

/// Tracks which request is currently in flight across all chains
///
/// A newer request supersedes any older one still deferred somewhere, so an
/// async resolution must check `is_current` before it resumes anything.
#[derive(Debug, Default)]
pub struct RequestTracker {
    // 0 = no request in flight
    current: AtomicU64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` as the request in flight
    pub fn begin(&self, id: RequestId) {
        self.current.store(id.0, Ordering::SeqCst);
    }

    /// Clear the in-flight request, but only if it is still `id`
    pub fn finish(&self, id: RequestId) {
        let _ = self
            .current
            .compare_exchange(id.0, 0, Ordering::SeqCst, Ordering::SeqCst);
    }

    pub fn is_current(&self, id: RequestId) -> bool {
        self.current.load(Ordering::SeqCst) == id.0
    }

    pub fn current(&self) -> Option<RequestId> {
        match self.current.load(Ordering::SeqCst) {
            0 => None,
            id => Some(RequestId(id)),
        }
    }
}
