//! Tandem domain types

mod play_mode;
mod search;
mod session;
mod track;

pub use play_mode::PlayMode;
pub use search::Candidate;
pub use session::{Initiator, ListeningDuration, SessionRecord, TrackChange};
pub use track::Track;
