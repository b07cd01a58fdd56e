//! Listen-together session record
//!
//! The table holds at most one row (`id = 1`). The invite flow creates it with
//! [`start`]; the playback engine only ever calls [`update_track`], which never
//! inserts.

use crate::error::{Result, StorageError};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteExecutor, SqlitePool};
use tandem_core::{Initiator, SessionRecord, TrackChange};

const SESSION_ROW_ID: i64 = 1;

/// Get the active session, if any
pub async fn get(pool: &SqlitePool) -> Result<Option<SessionRecord>> {
    fetch(pool).await
}

/// Start a session, replacing any existing one
pub async fn start(pool: &SqlitePool, record: &SessionRecord) -> Result<()> {
    sqlx::query(
        "INSERT INTO listening_session
         (id, partner_id, track_title, track_artist, started_at, changed_at, changed_by)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
            partner_id = excluded.partner_id,
            track_title = excluded.track_title,
            track_artist = excluded.track_artist,
            started_at = excluded.started_at,
            changed_at = excluded.changed_at,
            changed_by = excluded.changed_by",
    )
    .bind(SESSION_ROW_ID)
    .bind(&record.partner_id)
    .bind(&record.track_title)
    .bind(&record.track_artist)
    .bind(record.started_at_epoch_ms)
    .bind(record.changed_at_epoch_ms)
    .bind(record.changed_by.map(Initiator::as_str))
    .execute(pool)
    .await?;

    Ok(())
}

/// Overwrite the track fields of the active session
///
/// Runs as a single transaction so the returned record reflects this write and
/// not a concurrent one. Returns `None` when no session exists.
pub async fn update_track(pool: &SqlitePool, change: &TrackChange) -> Result<Option<SessionRecord>> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "UPDATE listening_session
         SET track_title = ?, track_artist = ?, changed_at = ?, changed_by = ?
         WHERE id = ?",
    )
    .bind(&change.title)
    .bind(&change.artist)
    .bind(change.changed_at_epoch_ms)
    .bind(change.changed_by.as_str())
    .bind(SESSION_ROW_ID)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(None);
    }

    let record = fetch(&mut *tx).await?;
    tx.commit().await?;

    Ok(record)
}

/// End the active session. Returns `false` if none was active.
pub async fn end(pool: &SqlitePool) -> Result<bool> {
    let result = sqlx::query("DELETE FROM listening_session WHERE id = ?")
        .bind(SESSION_ROW_ID)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

async fn fetch<'e, E>(executor: E) -> Result<Option<SessionRecord>>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query(
        "SELECT partner_id, track_title, track_artist, started_at, changed_at, changed_by
         FROM listening_session WHERE id = ?",
    )
    .bind(SESSION_ROW_ID)
    .fetch_optional(executor)
    .await?;

    row.as_ref().map(record_from_row).transpose()
}

fn record_from_row(row: &SqliteRow) -> Result<SessionRecord> {
    let changed_by: Option<String> = row.try_get("changed_by")?;
    let changed_by = changed_by
        .map(|raw| {
            Initiator::from_str(&raw)
                .ok_or_else(|| StorageError::Corrupt(format!("unknown initiator: {raw}")))
        })
        .transpose()?;

    Ok(SessionRecord {
        partner_id: row.try_get("partner_id")?,
        track_title: row.try_get("track_title")?,
        track_artist: row.try_get("track_artist")?,
        started_at_epoch_ms: row.try_get("started_at")?,
        changed_at_epoch_ms: row.try_get("changed_at")?,
        changed_by,
    })
}
