//! `SQLite` implementation of the `tandem-core` store traits

use crate::{library, preferences, session};
use async_trait::async_trait;
use sqlx::SqlitePool;
use tandem_core::{
    LibraryStore, PlayMode, PreferenceStore, Result, SessionRecord, SessionStore, Track,
    TrackChange,
};

/// Local storage context backed by a `SQLite` pool
///
/// Implements all three store traits, so one `Arc<LocalStorageContext>` can be
/// handed to the playback engine for each of them.
#[derive(Debug, Clone)]
pub struct LocalStorageContext {
    pool: SqlitePool,
}

impl LocalStorageContext {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl LibraryStore for LocalStorageContext {
    async fn load_all(&self) -> Result<Vec<Track>> {
        Ok(library::get_all(&self.pool).await?)
    }

    async fn find(&self, title: &str, artist: &str) -> Result<Option<Track>> {
        Ok(library::find_by_title_artist(&self.pool, title, artist).await?)
    }

    async fn append(&self, track: &Track) -> Result<()> {
        Ok(library::append(&self.pool, track).await?)
    }
}

#[async_trait]
impl PreferenceStore for LocalStorageContext {
    async fn play_mode(&self) -> Result<Option<PlayMode>> {
        Ok(preferences::get_play_mode(&self.pool).await?)
    }

    async fn set_play_mode(&self, mode: PlayMode) -> Result<()> {
        Ok(preferences::set_play_mode(&self.pool, mode).await?)
    }
}

#[async_trait]
impl SessionStore for LocalStorageContext {
    async fn get(&self) -> Result<Option<SessionRecord>> {
        Ok(session::get(&self.pool).await?)
    }

    async fn start(&self, record: SessionRecord) -> Result<()> {
        Ok(session::start(&self.pool, &record).await?)
    }

    async fn update_track(&self, change: &TrackChange) -> Result<Option<SessionRecord>> {
        Ok(session::update_track(&self.pool, change).await?)
    }

    async fn end(&self) -> Result<bool> {
        Ok(session::end(&self.pool).await?)
    }
}
