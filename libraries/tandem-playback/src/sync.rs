//! Session synchronizer
//!
//! Mirrors the current track into the shared listen-together record. The
//! record is owned by the invite flow; this only ever overwrites the track
//! fields of an existing record.

use crate::error::Result;
use std::sync::Arc;
use tandem_core::{Initiator, SessionRecord, SessionStore, Track, TrackChange};
use tracing::{debug, info};

/// Writes track changes into the shared session record
#[derive(Clone)]
pub struct SessionSynchronizer {
    store: Arc<dyn SessionStore>,
}

impl SessionSynchronizer {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Record that `track` became current because of `initiator`
    ///
    /// Returns the updated record, or `None` when no session is active.
    pub async fn on_track_changed(
        &self,
        track: &Track,
        initiator: Initiator,
    ) -> Result<Option<SessionRecord>> {
        let change = TrackChange {
            title: track.title.clone(),
            artist: track.artist.clone(),
            changed_at_epoch_ms: chrono::Utc::now().timestamp_millis(),
            changed_by: initiator,
        };

        let updated = self.store.update_track(&change).await?;
        match &updated {
            Some(record) => info!(
                partner_id = %record.partner_id,
                title = %change.title,
                changed_by = %initiator,
                "Session record updated"
            ),
            None => debug!("No active session, nothing to sync"),
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_core::memory::MemorySessionStore;

    fn track() -> Track {
        Track::new("b", "Song B", "Artist B").with_stream_locator("https://cdn/b")
    }

    #[tokio::test]
    async fn no_session_is_a_noop() {
        let store = Arc::new(MemorySessionStore::new());
        let sync = SessionSynchronizer::new(store.clone());

        assert!(sync.on_track_changed(&track(), Initiator::User).await.unwrap().is_none());
        assert!(store.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn overwrites_track_fields() {
        let record = SessionRecord::new("partner-1", "Song A", "Artist A", 1_000);
        let store = Arc::new(MemorySessionStore::with_record(record));
        let sync = SessionSynchronizer::new(store.clone());

        let before = chrono::Utc::now().timestamp_millis();
        let updated = sync
            .on_track_changed(&track(), Initiator::User)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.partner_id, "partner-1");
        assert_eq!(updated.track_title, "Song B");
        assert_eq!(updated.track_artist, "Artist B");
        assert_eq!(updated.started_at_epoch_ms, 1_000);
        assert_eq!(updated.changed_by, Some(Initiator::User));
        assert!(updated.changed_at_epoch_ms.unwrap() >= before);
        assert_eq!(store.get().await.unwrap(), Some(updated));
    }
}
