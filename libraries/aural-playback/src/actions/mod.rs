//! Chain actions
//!
//! Start chain: cancel transcoding -> halt -> prepare -> start.
//! Stop chain: cancel transcoding -> halt.
//! Track-completed chain: delay after completion.

mod cancel_transcoding;
mod delay;
mod halt;
mod preparation;
mod start;

pub use cancel_transcoding::CancelTranscodingAction;
pub use delay::DelayAfterTrackCompletionAction;
pub use halt::HaltPlaybackAction;
pub use preparation::AudioFilePreparationAction;
pub use start::StartPlaybackAction;
