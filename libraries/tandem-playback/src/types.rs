//! Engine configuration and observable state

use serde::{Deserialize, Serialize};
use tandem_core::{PlayMode, Track};

/// How concurrent remote track requests are reconciled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolvePolicy {
    /// Whichever resolve finishes last becomes current
    #[default]
    LastFinished,

    /// Only the most recently issued request may become current; older
    /// results fail with `Superseded`
    LatestRequest,
}

/// Playback engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Initial volume (0.0 - 1.0)
    pub volume: f32,

    /// Concurrent request policy
    pub resolve_policy: ResolvePolicy,

    /// Capacity of the event broadcast channel
    pub event_capacity: usize,

    /// Capacity of the command channel
    pub command_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            volume: 0.8,
            resolve_policy: ResolvePolicy::LastFinished,
            event_capacity: 100,
            command_capacity: 32,
        }
    }
}

/// Read-only view of the engine state
///
/// This is what a companion UI renders: current song, playing flag, time,
/// duration, playlist, index and mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    pub current_track: Option<Track>,

    /// Index into `playlist`; `None` when nothing is current or the current
    /// track is no longer in the playlist
    pub current_index: Option<usize>,

    pub is_playing: bool,
    pub position_secs: f64,
    pub duration_secs: f64,
    pub volume: f32,
    pub playlist: Vec<Track>,
    pub play_mode: PlayMode,
}
