//! Test helpers for storage integration tests
//!
//! Databases are REAL SQLite files in a temp dir (NOT in-memory), so every
//! pooled connection sees the same schema and data.

#![allow(dead_code)]

use sqlx::SqlitePool;
use tandem_core::Track;
use tempfile::TempDir;

/// Test database wrapper that cleans up on drop
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with migrations applied
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let pool = tandem_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");

        tandem_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Self {
            pool,
            _temp_dir: temp_dir,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Test fixture: a resolved track
pub fn resolved_track(id: &str, title: &str, artist: &str) -> Track {
    let mut track = Track::new(id, title, artist)
        .with_stream_locator(format!("https://cdn.example.com/{id}.mp3"));
    track.album = "Test Album".to_string();
    track.duration_ms = 180_000;
    track
}
