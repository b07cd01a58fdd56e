//! In-memory store implementations
//!
//! Used by tests and by hosts that do not need persistence across restarts.

use crate::error::Result;
use crate::traits::{LibraryStore, PreferenceStore, SessionStore};
use crate::types::{PlayMode, SessionRecord, Track, TrackChange};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// In-memory library
#[derive(Debug, Default)]
pub struct MemoryLibraryStore {
    tracks: RwLock<Vec<Track>>,
}

impl MemoryLibraryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a library pre-filled with tracks
    pub fn with_tracks(tracks: Vec<Track>) -> Self {
        Self {
            tracks: RwLock::new(tracks),
        }
    }
}

#[async_trait]
impl LibraryStore for MemoryLibraryStore {
    async fn load_all(&self) -> Result<Vec<Track>> {
        Ok(self.tracks.read().await.clone())
    }

    async fn find(&self, title: &str, artist: &str) -> Result<Option<Track>> {
        Ok(self
            .tracks
            .read()
            .await
            .iter()
            .find(|track| track.is_resolved() && track.matches(title, artist))
            .cloned())
    }

    async fn append(&self, track: &Track) -> Result<()> {
        self.tracks.write().await.push(track.clone());
        Ok(())
    }
}

/// In-memory play-mode preference
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    play_mode: RwLock<Option<PlayMode>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_play_mode(mode: PlayMode) -> Self {
        Self {
            play_mode: RwLock::new(Some(mode)),
        }
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn play_mode(&self) -> Result<Option<PlayMode>> {
        Ok(*self.play_mode.read().await)
    }

    async fn set_play_mode(&self, mode: PlayMode) -> Result<()> {
        *self.play_mode.write().await = Some(mode);
        Ok(())
    }
}

/// In-memory session record
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    record: RwLock<Option<SessionRecord>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: SessionRecord) -> Self {
        Self {
            record: RwLock::new(Some(record)),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self) -> Result<Option<SessionRecord>> {
        Ok(self.record.read().await.clone())
    }

    async fn start(&self, record: SessionRecord) -> Result<()> {
        *self.record.write().await = Some(record);
        Ok(())
    }

    async fn update_track(&self, change: &TrackChange) -> Result<Option<SessionRecord>> {
        let mut guard = self.record.write().await;
        Ok(guard.as_mut().map(|record| {
            record.apply(change);
            record.clone()
        }))
    }

    async fn end(&self) -> Result<bool> {
        Ok(self.record.write().await.take().is_some())
    }
}
