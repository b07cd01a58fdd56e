//! Preference storage
//!
//! Preferences are stored as key-value pairs with JSON-serialized values.
//!
//! # Example
//!
//! ```rust,no_run
//! use tandem_storage::preferences;
//! use tandem_core::PlayMode;
//! # async fn example(pool: &sqlx::SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
//! preferences::set_play_mode(pool, PlayMode::Shuffle).await?;
//! let mode = preferences::get_play_mode(pool).await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, StorageError};
use sqlx::{Row, SqlitePool};
use tandem_core::PlayMode;

/// Play mode preference (`"sequence"`, `"shuffle"`, `"repeat-one"`, `"repeat-all"`)
pub const SETTING_PLAY_MODE: &str = "playback.play_mode";

/// Get a single preference value
///
/// Returns `Ok(None)` if the key was never set.
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<serde_json::Value>> {
    let row = sqlx::query("SELECT value FROM preferences WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => {
            let raw: String = row.try_get("value")?;
            let value = serde_json::from_str(&raw)
                .map_err(|e| StorageError::SerializationError(e.to_string()))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Set a preference value
pub async fn set_setting(pool: &SqlitePool, key: &str, value: &serde_json::Value) -> Result<()> {
    let value_str = serde_json::to_string(value)
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO preferences (key, value, updated_at)
         VALUES (?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
    )
    .bind(key)
    .bind(value_str)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get the stored play mode, `None` on first run
pub async fn get_play_mode(pool: &SqlitePool) -> Result<Option<PlayMode>> {
    get_setting(pool, SETTING_PLAY_MODE)
        .await?
        .map(|value| {
            serde_json::from_value(value)
                .map_err(|e| StorageError::Corrupt(format!("{SETTING_PLAY_MODE}: {e}")))
        })
        .transpose()
}

/// Store the play mode
pub async fn set_play_mode(pool: &SqlitePool, mode: PlayMode) -> Result<()> {
    set_setting(pool, SETTING_PLAY_MODE, &serde_json::json!(mode.as_str())).await
}
