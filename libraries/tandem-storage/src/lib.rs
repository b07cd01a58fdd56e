//! Tandem Storage
//!
//! `SQLite` persistence for the three resources the playback engine shares
//! with the rest of the application:
//!
//! - **Library**: resolved tracks, used as a resolve cache
//! - **Preferences**: the play mode (and other key/value settings)
//! - **Session**: the listen-together record, created by the invite flow
//!
//! # Architecture
//!
//! - **Vertical Slicing**: Each feature owns its own queries ([`library`],
//!   [`preferences`], [`session`])
//! - **Trait Adapters**: [`LocalStorageContext`] implements the `tandem-core`
//!   store traits on top of those queries
//!
//! # Example
//!
//! ```rust,no_run
//! use tandem_storage::{LocalStorageContext, create_pool, run_migrations};
//! use tandem_core::PreferenceStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://tandem.db").await?;
//! run_migrations(&pool).await?;
//!
//! let storage = LocalStorageContext::new(pool);
//! let mode = storage.play_mode().await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

pub mod library;
pub mod preferences;
pub mod session;

pub use context::LocalStorageContext;
pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use tracing::debug;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// Call once at startup, before handing the pool to [`LocalStorageContext`].
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `sqlite://tandem.db`)
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    debug!(url = %database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    debug!("SQLite pool ready");

    Ok(pool)
}
