/// Remote search result type
use crate::types::Track;
use serde::{Deserialize, Serialize};

/// A search hit from the remote search-and-resolve service
///
/// Carries display metadata only; the stream locator is fetched separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Service-specific identifier used to fetch the locator
    pub id: String,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub cover: String,
}

impl Candidate {
    /// Build a resolved track from this candidate and its locator
    pub fn into_track(self, stream_locator: String) -> Track {
        Track {
            id: self.id,
            title: self.title,
            artist: self.artist,
            album: self.album,
            duration_ms: self.duration_ms,
            cover: self.cover,
            stream_locator: Some(stream_locator),
            lyrics: None,
        }
    }
}
