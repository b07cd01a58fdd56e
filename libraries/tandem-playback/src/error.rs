//! Error types for the playback engine

use tandem_core::TandemError;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// Remote search returned no candidates (or no search service is configured)
    #[error("No track found for \"{title}\" by \"{artist}\"")]
    NotFound { title: String, artist: String },

    /// A candidate was found but has no playable stream
    #[error("\"{title}\" by \"{artist}\" has no playable stream")]
    Unresolvable { title: String, artist: String },

    /// Track has no stream locator and cannot be loaded
    #[error("Track {0} has no stream locator")]
    InvalidTrack(String),

    /// Backend refused to load or start the resource
    #[error("Playback failed to start: {0}")]
    PlaybackStartFailure(String),

    /// No track is currently loaded
    #[error("No track loaded")]
    NotLoaded,

    /// Playlist is empty
    #[error("Playlist is empty")]
    EmptyPlaylist,

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// A newer track request finished first
    #[error("Request superseded by a newer track request")]
    Superseded,

    /// Remote search service failure
    #[error("Search error: {0}")]
    Search(String),

    /// Persistent store failure
    #[error("Store error: {0}")]
    Store(String),

    /// The engine task is no longer running
    #[error("Playback engine stopped")]
    EngineStopped,
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

impl From<TandemError> for PlaybackError {
    fn from(err: TandemError) -> Self {
        match err {
            TandemError::Search(msg) => PlaybackError::Search(msg),
            other => PlaybackError::Store(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_errors_keep_their_kind() {
        let err: PlaybackError = TandemError::search("timeout").into();
        assert_eq!(err, PlaybackError::Search("timeout".into()));
    }

    #[test]
    fn other_core_errors_become_store_errors() {
        let err: PlaybackError = TandemError::storage("disk full").into();
        assert!(matches!(err, PlaybackError::Store(msg) if msg.contains("disk full")));
    }
}
