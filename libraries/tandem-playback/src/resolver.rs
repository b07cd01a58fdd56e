//! Track resolver
//!
//! Finds a playable track by title and artist: first in the local playlist
//! (synchronously), then through the remote search service. The engine checks
//! the persisted library in between.

use crate::error::{PlaybackError, Result};
use std::sync::Arc;
use tandem_core::{Track, TrackSearch};
use tracing::{debug, info};

/// Local-then-remote track lookup
#[derive(Clone, Default)]
pub struct TrackResolver {
    search: Option<Arc<dyn TrackSearch>>,
}

impl TrackResolver {
    /// Resolver with a remote fallback
    pub fn new(search: Arc<dyn TrackSearch>) -> Self {
        Self {
            search: Some(search),
        }
    }

    /// Resolver that only looks at the local playlist
    pub fn local_only() -> Self {
        Self { search: None }
    }

    /// Find the first resolved track matching title and artist
    ///
    /// Case-insensitive exact match; placeholders without a stream locator
    /// are skipped.
    pub fn find_local(playlist: &[Track], title: &str, artist: &str) -> Option<(usize, Track)> {
        playlist
            .iter()
            .enumerate()
            .find(|(_, track)| track.is_resolved() && track.matches(title, artist))
            .map(|(index, track)| (index, track.clone()))
    }

    /// Resolve through the remote service
    ///
    /// Takes the first candidate for `"{title} {artist}"`. The returned track
    /// is not yet part of any playlist.
    pub async fn resolve_remote(&self, title: &str, artist: &str) -> Result<Track> {
        let not_found = || PlaybackError::NotFound {
            title: title.to_string(),
            artist: artist.to_string(),
        };

        let search = self.search.as_ref().ok_or_else(not_found)?;
        let query = search_query(title, artist);
        debug!(query = %query, "Searching remote service");

        let candidate = search
            .search(&query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(not_found)?;

        let locator = search
            .stream_locator(&candidate.id)
            .await?
            .filter(|locator| !locator.trim().is_empty())
            .ok_or_else(|| PlaybackError::Unresolvable {
                title: title.to_string(),
                artist: artist.to_string(),
            })?;

        info!(
            candidate_id = %candidate.id,
            title = %candidate.title,
            artist = %candidate.artist,
            "Resolved track remotely"
        );
        Ok(candidate.into_track(locator))
    }
}

fn search_query(title: &str, artist: &str) -> String {
    format!("{} {}", title.trim(), artist.trim()).trim().to_string()
}
