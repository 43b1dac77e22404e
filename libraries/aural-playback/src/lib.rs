//! Aural - Playback Transitions
//!
//! Platform-agnostic playback transition chains for Aural.
//!
//! This crate provides:
//! - Request contexts with identity-based staleness checks
//! - Ordered, replaceable chain actions over a shared request context
//! - Deferral of a start request while its track is transcoded
//! - Gap computation when a track completes
//! - Notifications for UI and sequencer observers
//!
//! # Architecture
//!
//! `aural-playback` never touches audio output, playlists or the transcoder
//! directly. Platform code implements the traits in [`services`] and hands
//! them to a [`TransitionController`]. Transcoding results come back over a
//! `crossbeam-channel` and are applied when the owner calls
//! [`TransitionController::process_events`], so no async runtime is needed.
//!
//! # Example: Custom Chain
//!
//! ```rust
//! use aural_playback::{
//!     ChainAction, ChainControl, ChainKind, NotificationBus, PlaybackChain, PlaybackParams,
//!     RequestContext, RequestTracker, Sequencer,
//! };
//! use aural_core::PlayerState;
//! use std::sync::Arc;
//!
//! struct EndOfLine;
//!
//! impl Sequencer for EndOfLine {
//!     fn end(&self) {}
//! }
//!
//! struct LogRequest;
//!
//! impl ChainAction for LogRequest {
//!     fn name(&self) -> &'static str {
//!         "log_request"
//!     }
//!
//!     fn execute(&mut self, context: RequestContext, chain: &mut dyn ChainControl) {
//!         println!("request {}", context.id());
//!         chain.proceed(context);
//!     }
//! }
//!
//! let mut chain = PlaybackChain::new(
//!     ChainKind::StartPlayback,
//!     Arc::new(EndOfLine),
//!     Arc::new(NotificationBus::new()),
//!     Arc::new(RequestTracker::new()),
//! )
//! .with_action(LogRequest);
//!
//! let context = RequestContext::new(PlayerState::Stopped, None, None, PlaybackParams::default());
//! assert!(chain.execute(context).is_completed());
//! ```

pub mod actions;
mod chain;
mod config;
mod context;
mod controller;
mod error;
pub mod events;
pub mod services;
pub mod types;

// Public exports
pub use chain::{
    ChainAction, ChainControl, ChainKind, ChainOutcome, ChainStep, PlaybackChain, Transition,
};
pub use crate::config::{PlaybackPreferences, SharedPreferences};
pub use context::{RequestContext, RequestId, RequestTracker};
pub use controller::{PlaybackServices, TransitionController};
pub use error::{PlaybackError, Result, TrackPreparationError};
pub use events::{NotificationBus, PlaybackNotification, PreTrackChange, TranscodingEvent};
pub use services::{PlayQueue, Player, Playlist, Preparation, Sequencer, TrackPreparer, Transcoder};
pub use types::PlaybackParams;
