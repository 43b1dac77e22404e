//! Domain types

mod gap;
mod ids;
mod player_state;
mod track;

pub use gap::{Gap, GapKind, GapPosition};
pub use ids::TrackId;
pub use player_state::PlayerState;
pub use track::Track;
