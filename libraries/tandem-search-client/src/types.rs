//! Types for the search service requests and responses.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tandem_core::Candidate;

/// Configuration for connecting to the search service.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Base URL of the service (e.g., "https://music-api.example.com")
    pub url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl SearchConfig {
    /// Create a config with the default 10 second timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(10),
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Song identifiers come back as numbers from some deployments and strings
/// from others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SongId {
    Number(u64),
    Text(String),
}

impl std::fmt::Display for SongId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SongId::Number(n) => write!(f, "{n}"),
            SongId::Text(s) => f.write_str(s),
        }
    }
}

/// One search hit.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SongHit {
    pub id: SongId,
    pub name: String,
    /// Artists joined into one display string
    #[serde(default)]
    pub artists: String,
    #[serde(default)]
    pub album: String,
    /// Duration in seconds
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub cover: String,
}

impl From<SongHit> for Candidate {
    fn from(hit: SongHit) -> Self {
        Candidate {
            id: hit.id.to_string(),
            title: hit.name,
            artist: hit.artists,
            album: hit.album,
            duration_ms: (hit.duration.max(0.0) * 1000.0).round() as u64,
            cover: hit.cover,
        }
    }
}

/// Response from `GET /search`.
#[derive(Debug, Deserialize, Serialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub songs: Vec<SongHit>,
}

/// Response from `GET /song/url`.
#[derive(Debug, Deserialize, Serialize)]
pub struct SongUrlResponse {
    #[serde(default)]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_text_ids_become_strings() {
        let json = r#"{"songs":[
            {"id": 1859245776, "name": "A", "artists": "X", "duration": 215.5},
            {"id": "abc", "name": "B"}
        ]}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let candidates: Vec<Candidate> = response.songs.into_iter().map(Candidate::from).collect();

        assert_eq!(candidates[0].id, "1859245776");
        assert_eq!(candidates[0].duration_ms, 215_500);
        assert_eq!(candidates[1].id, "abc");
        assert_eq!(candidates[1].artist, "");
    }

    #[test]
    fn missing_url_is_none() {
        let response: SongUrlResponse = serde_json::from_str("{}").unwrap();
        assert!(response.url.is_none());

        let response: SongUrlResponse = serde_json::from_str(r#"{"url":null}"#).unwrap();
        assert!(response.url.is_none());
    }
}
