//! Playback events
//!
//! Published by the engine on a broadcast channel after the state they
//! describe has been applied:
//! - State changes (playing/paused)
//! - Track changes, with who caused them
//! - Position updates (every backend tick while playing)
//! - Play mode and playlist changes

use serde::{Deserialize, Serialize};
use tandem_core::{Initiator, PlayMode, Track};

/// Events emitted by the playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Playing flag changed
    StateChanged { is_playing: bool },

    /// A new track became current and was loaded
    TrackChanged {
        track: Track,
        /// Index in the playlist at the time of the change
        index: Option<usize>,
        initiator: Initiator,
    },

    /// Position update
    PositionUpdate { position_ms: u64, duration_ms: u64 },

    /// Track reached its natural end
    TrackFinished { track_id: String },

    /// Play mode changed
    PlayModeChanged { mode: PlayMode },

    /// Playlist replaced or extended
    PlaylistChanged { length: usize },

    /// Error that was not returned to a caller
    Error { message: String },
}
