/// Track domain type
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A playable song
///
/// `stream_locator` is `None` while the track is a placeholder that still
/// needs resolving. Such a track must never become the current track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: String,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album name (empty when unknown)
    #[serde(default)]
    pub album: String,

    /// Track duration in milliseconds
    #[serde(default)]
    pub duration_ms: u64,

    /// Cover art locator (URL or data URI)
    #[serde(default)]
    pub cover: String,

    /// Playable stream locator
    #[serde(default)]
    pub stream_locator: Option<String>,

    /// Plain-text or LRC lyrics
    #[serde(default)]
    pub lyrics: Option<String>,
}

impl Track {
    /// Create an unresolved track with minimal metadata
    pub fn new(id: impl Into<String>, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            album: String::new(),
            duration_ms: 0,
            cover: String::new(),
            stream_locator: None,
            lyrics: None,
        }
    }

    /// Set the stream locator
    #[must_use]
    pub fn with_stream_locator(mut self, locator: impl Into<String>) -> Self {
        self.stream_locator = Some(locator.into());
        self
    }

    /// Set the duration
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = duration.as_millis() as u64;
        self
    }

    /// Whether the track can be played
    pub fn is_resolved(&self) -> bool {
        self.stream_locator
            .as_deref()
            .is_some_and(|locator| !locator.trim().is_empty())
    }

    /// Get the track duration as a Duration
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Case-insensitive exact match on title and artist
    pub fn matches(&self, title: &str, artist: &str) -> bool {
        eq_ignore_case(&self.title, title) && eq_ignore_case(&self.artist, artist)
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_until_locator_set() {
        let track = Track::new("1", "Song", "Artist");
        assert!(!track.is_resolved());

        let track = track.with_stream_locator("https://cdn.example.com/1.mp3");
        assert!(track.is_resolved());
    }

    #[test]
    fn blank_locator_is_unresolved() {
        let track = Track::new("1", "Song", "Artist").with_stream_locator("  ");
        assert!(!track.is_resolved());
    }

    #[test]
    fn matches_ignores_case_but_not_content() {
        let track = Track::new("1", "Blue Bird", "Ikimono-gakari");

        assert!(track.matches("blue bird", "IKIMONO-GAKARI"));
        assert!(track.matches("Blue Bird ", "Ikimono-gakari"));
        assert!(!track.matches("Blue", "Ikimono-gakari"));
        assert!(!track.matches("Blue Bird", "Someone Else"));
    }

    #[test]
    fn deserializes_with_missing_optional_fields() {
        let track: Track =
            serde_json::from_str(r#"{"id":"7","title":"T","artist":"A"}"#).unwrap();
        assert_eq!(track.album, "");
        assert_eq!(track.duration_ms, 0);
        assert!(track.stream_locator.is_none());
    }
}
