//! Aural Core
//!
//! Platform-agnostic domain types shared by the Aural playback libraries.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Gap`, `PlayerState`
//! - **Error Handling**: `CoreError` and `Result`
//!
//! # Example
//!
//! ```rust
//! use aural_core::types::{Gap, GapPosition, Track};
//! use std::path::PathBuf;
//! use std::time::Duration;
//!
//! let track = Track::new("My Favorite Song", PathBuf::from("/music/song.flac"));
//! let gap = Gap::one_time(Duration::from_secs(5), GapPosition::AfterTrack).unwrap();
//!
//! assert!(gap.is_one_time());
//! assert_eq!(track.title, "My Favorite Song");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod types;

pub use error::{CoreError, Result};
pub use types::{Gap, GapKind, GapPosition, PlayerState, Track, TrackId};
