//! Local library of resolved tracks

use crate::error::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tandem_core::Track;

/// Get all tracks in insertion order
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Track>> {
    let rows = sqlx::query(
        "SELECT id, title, artist, album, duration_ms, cover, stream_locator, lyrics
         FROM library_tracks ORDER BY seq",
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(track_from_row).collect()
}

/// Find the first playable track matching title and artist (case-insensitive)
pub async fn find_by_title_artist(
    pool: &SqlitePool,
    title: &str,
    artist: &str,
) -> Result<Option<Track>> {
    let row = sqlx::query(
        "SELECT id, title, artist, album, duration_ms, cover, stream_locator, lyrics
         FROM library_tracks
         WHERE title = ? COLLATE NOCASE AND artist = ? COLLATE NOCASE
           AND TRIM(COALESCE(stream_locator, '')) != ''
         ORDER BY seq LIMIT 1",
    )
    .bind(title.trim())
    .bind(artist.trim())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(track_from_row).transpose()
}

/// Append a track to the library
pub async fn append(pool: &SqlitePool, track: &Track) -> Result<()> {
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO library_tracks
         (id, title, artist, album, duration_ms, cover, stream_locator, lyrics, added_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&track.id)
    .bind(&track.title)
    .bind(&track.artist)
    .bind(&track.album)
    .bind(track.duration_ms as i64)
    .bind(&track.cover)
    .bind(track.stream_locator.as_deref())
    .bind(track.lyrics.as_deref())
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

fn track_from_row(row: &SqliteRow) -> Result<Track> {
    let duration_ms: i64 = row.try_get("duration_ms")?;

    Ok(Track {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        artist: row.try_get("artist")?,
        album: row.try_get("album")?,
        duration_ms: duration_ms.max(0) as u64,
        cover: row.try_get("cover")?,
        stream_locator: row.try_get("stream_locator")?,
        lyrics: row.try_get("lyrics")?,
    })
}
