//! Store and search traits
//!
//! The playback engine only sees these narrow interfaces. Everything behind
//! them (SQLite, HTTP, in-memory) is replaceable.

use crate::error::Result;
use crate::types::{Candidate, PlayMode, SessionRecord, Track, TrackChange};
use async_trait::async_trait;

/// Persisted collection of resolved tracks
///
/// Acts as a cache so repeated requests for the same title/artist resolve
/// without touching the network.
#[async_trait]
pub trait LibraryStore: Send + Sync {
    /// Get all tracks in insertion order
    async fn load_all(&self) -> Result<Vec<Track>>;

    /// First playable track matching title and artist, case-insensitively
    async fn find(&self, title: &str, artist: &str) -> Result<Option<Track>>;

    /// Append a track (duplicates by id are kept)
    async fn append(&self, track: &Track) -> Result<()>;
}

/// Persisted play-mode preference
///
/// Read on every write so concurrent writers are never clobbered by a cached
/// copy.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Get the stored play mode, `None` on first run
    async fn play_mode(&self) -> Result<Option<PlayMode>>;

    /// Store the play mode
    async fn set_play_mode(&self, mode: PlayMode) -> Result<()>;
}

/// Externally owned listen-together record
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Get the active session, if any
    async fn get(&self) -> Result<Option<SessionRecord>>;

    /// Start (or replace) a session. Used by the invite flow.
    async fn start(&self, record: SessionRecord) -> Result<()>;

    /// Overwrite the track fields of the active session
    ///
    /// Never creates a session. Returns the updated record, or `None` when no
    /// session exists.
    async fn update_track(&self, change: &TrackChange) -> Result<Option<SessionRecord>>;

    /// End the active session. Returns `false` if none was active.
    async fn end(&self) -> Result<bool>;
}

/// Remote search-and-resolve service
#[async_trait]
pub trait TrackSearch: Send + Sync {
    /// Search for candidates matching a free-text query
    async fn search(&self, query: &str) -> Result<Vec<Candidate>>;

    /// Get a playable locator for a candidate, `None` if it cannot be played
    async fn stream_locator(&self, candidate_id: &str) -> Result<Option<String>>;
}
