//! Command implementations

use crate::config::TandemConfig;
use anyhow::Context;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tandem_core::{
    LibraryStore, PlayMode, PreferenceStore, SessionRecord, SessionStore, Track, TrackSearch,
};
use tandem_playback::{
    event_channel, EngineHandle, EngineParts, PlaybackEngine, PlaybackEvent, SimulatedBackend,
    TrackChangeRequest,
};
use tandem_search_client::{SearchClient, SearchConfig};
use tandem_storage::LocalStorageContext;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

/// Outcome of an import
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    pub duplicates: usize,
    pub unresolved: usize,
}

/// Opened storage plus configuration, shared by every command
pub struct App {
    config: TandemConfig,
    storage: Arc<LocalStorageContext>,
}

impl App {
    pub async fn open(config: TandemConfig) -> anyhow::Result<Self> {
        let pool = tandem_storage::create_pool(&config.storage.database_url)
            .await
            .with_context(|| format!("opening {}", config.storage.database_url))?;
        tandem_storage::run_migrations(&pool).await?;
        debug!("Database ready");

        Ok(Self {
            config,
            storage: Arc::new(LocalStorageContext::new(pool)),
        })
    }

    fn search_client(&self) -> anyhow::Result<Option<Arc<dyn TrackSearch>>> {
        let Some(base_url) = &self.config.search.base_url else {
            return Ok(None);
        };
        let client = SearchClient::new(
            SearchConfig::new(base_url.clone()).with_timeout(self.config.search.timeout()),
        )?;
        Ok(Some(Arc::new(client)))
    }

    async fn spawn_engine(&self) -> anyhow::Result<EngineHandle> {
        let (tx, rx) = event_channel();
        let backend = SimulatedBackend::new(self.config.playback.tick(), tx);

        let mut parts = EngineParts::new(Box::new(backend), rx)
            .with_library(self.storage.clone())
            .with_preferences(self.storage.clone())
            .with_session(self.storage.clone());
        match self.search_client()? {
            Some(search) => parts = parts.with_search(search),
            None => info!("No search service configured, only library tracks can be played"),
        }

        Ok(PlaybackEngine::spawn(parts, self.config.playback.engine_config()).await)
    }

    // ===== Playback =====

    pub async fn play(&self, title: &str, artist: &str) -> anyhow::Result<()> {
        self.play_request(TrackChangeRequest::new(title, artist)).await
    }

    pub async fn say(&self, text: &str) -> anyhow::Result<()> {
        match TrackChangeRequest::parse_command(text) {
            Some(request) => self.play_request(request).await,
            None => {
                println!("No track-change command in message");
                Ok(())
            }
        }
    }

    async fn play_request(&self, request: TrackChangeRequest) -> anyhow::Result<()> {
        let engine = self.spawn_engine().await?;
        let loaded = engine.load_library().await?;
        debug!(count = loaded, "Library loaded");

        let mut events = engine.subscribe();
        let track = match engine.request_track(request).await {
            Ok(track) => track,
            Err(e) => {
                engine.shutdown().await;
                return Err(e.into());
            }
        };
        print_now_playing(&track);

        let result = follow(&engine, &mut events).await;
        engine.shutdown().await;
        result
    }

    // ===== Library =====

    pub async fn import(&self, path: &Path) -> anyhow::Result<()> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let tracks: Vec<Track> = serde_json::from_str(&contents)
            .with_context(|| format!("parsing {}", path.display()))?;

        let summary = self.import_tracks(tracks).await?;
        println!(
            "Imported {} track(s), skipped {} duplicate(s) and {} without a stream",
            summary.added, summary.duplicates, summary.unresolved
        );
        Ok(())
    }

    /// Append resolved tracks whose id is not yet in the library
    pub async fn import_tracks(&self, tracks: Vec<Track>) -> anyhow::Result<ImportSummary> {
        let mut known: HashSet<String> = self
            .storage
            .load_all()
            .await?
            .into_iter()
            .map(|track| track.id)
            .collect();

        let mut summary = ImportSummary::default();
        for track in tracks {
            if !track.is_resolved() {
                warn!(track_id = %track.id, "Skipping track without a stream locator");
                summary.unresolved += 1;
                continue;
            }
            if !known.insert(track.id.clone()) {
                summary.duplicates += 1;
                continue;
            }
            self.storage.append(&track).await?;
            summary.added += 1;
        }

        info!(
            added = summary.added,
            duplicates = summary.duplicates,
            unresolved = summary.unresolved,
            "Import finished"
        );
        Ok(summary)
    }

    pub async fn library(&self) -> anyhow::Result<()> {
        let tracks = self.storage.load_all().await?;
        if tracks.is_empty() {
            println!("Library is empty");
            return Ok(());
        }

        println!("Library:");
        for (index, track) in tracks.iter().enumerate() {
            println!(
                "  {:>3}. {} - {} [{}]",
                index + 1,
                track.title,
                track.artist,
                format_duration(track.duration_ms)
            );
        }
        Ok(())
    }

    // ===== Play mode =====

    pub async fn show_mode(&self) -> anyhow::Result<()> {
        let mode = self.storage.play_mode().await?.unwrap_or_default();
        println!("Play mode: {mode}");
        Ok(())
    }

    pub async fn toggle_mode(&self) -> anyhow::Result<()> {
        let engine = self.spawn_engine().await?;
        let result = engine.toggle_play_mode().await;
        engine.shutdown().await;
        println!("Play mode: {}", result?);
        Ok(())
    }

    pub async fn set_mode(&self, mode: PlayMode) -> anyhow::Result<()> {
        let engine = self.spawn_engine().await?;
        let result = engine.set_play_mode(mode).await;
        engine.shutdown().await;
        result?;
        println!("Play mode: {mode}");
        Ok(())
    }

    // ===== Session =====

    pub async fn invite(&self, partner: &str, title: &str, artist: &str) -> anyhow::Result<()> {
        let record = SessionRecord::new(partner, title, artist, now_epoch_ms());
        self.storage.start(record).await?;
        info!(partner = %partner, "Listening session started");
        println!("Listening together with {partner}: {title} - {artist}");
        Ok(())
    }

    pub async fn leave(&self) -> anyhow::Result<()> {
        if self.storage.end().await? {
            println!("Listening session ended");
        } else {
            println!("No listening session");
        }
        Ok(())
    }

    pub async fn session(&self) -> anyhow::Result<()> {
        let Some(record) = self.storage.get().await? else {
            println!("No listening session");
            return Ok(());
        };

        println!("Listening together with {}", record.partner_id);
        println!("  Track:    {} - {}", record.track_title, record.track_artist);
        if let Some(changed_by) = record.changed_by {
            println!("  Changed by: {changed_by}");
        }
        println!("  Together: {}", record.elapsed(now_epoch_ms()));
        Ok(())
    }
}

/// Print playback events until playback stops or the user interrupts
async fn follow(
    engine: &EngineHandle,
    events: &mut tokio::sync::broadcast::Receiver<PlaybackEvent>,
) -> anyhow::Result<()> {
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            result = &mut ctrl_c => {
                result?;
                info!("Interrupted, stopping playback");
                if let Err(e) = engine.pause().await {
                    debug!(error = %e, "Nothing to pause");
                }
                return Ok(());
            }
            event = events.recv() => match event {
                Ok(PlaybackEvent::TrackChanged { track, .. }) => print_now_playing(&track),
                Ok(PlaybackEvent::StateChanged { is_playing: false }) => {
                    println!("Playback stopped");
                    return Ok(());
                }
                Ok(PlaybackEvent::PositionUpdate { position_ms, duration_ms }) => {
                    debug!(position_ms, duration_ms, "Position");
                }
                Ok(PlaybackEvent::Error { message }) => eprintln!("Error: {message}"),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event receiver lagged");
                }
                Err(RecvError::Closed) => return Ok(()),
            }
        }
    }
}

fn print_now_playing(track: &Track) {
    println!(
        "Now playing: {} - {} [{}]",
        track.title,
        track.artist,
        format_duration(track.duration_ms)
    );
}

fn format_duration(duration_ms: u64) -> String {
    let secs = duration_ms / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn now_epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn open_app(dir: &tempfile::TempDir) -> App {
        let mut config = TandemConfig::default();
        config.storage.database_url =
            format!("sqlite://{}", dir.path().join("tandem.db").display());
        App::open(config).await.unwrap()
    }

    fn resolved(id: &str) -> Track {
        Track::new(id, format!("Song {id}"), "Artist")
            .with_stream_locator(format!("https://cdn.example.com/{id}.mp3"))
            .with_duration(Duration::from_secs(200))
    }

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(65_000), "1:05");
        assert_eq!(format_duration(3_600_000), "60:00");
    }

    #[tokio::test]
    async fn import_skips_duplicates_and_unresolved() {
        let dir = tempfile::tempdir().unwrap();
        let app = open_app(&dir).await;

        let first = app
            .import_tracks(vec![resolved("a"), resolved("b")])
            .await
            .unwrap();
        assert_eq!(first.added, 2);

        let second = app
            .import_tracks(vec![
                resolved("b"),
                Track::new("p", "Placeholder", "Artist"),
                resolved("c"),
                resolved("c"),
            ])
            .await
            .unwrap();
        assert_eq!(
            second,
            ImportSummary {
                added: 1,
                duplicates: 2,
                unresolved: 1,
            }
        );

        let ids: Vec<String> = app
            .storage
            .load_all()
            .await
            .unwrap()
            .into_iter()
            .map(|track| track.id)
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn invite_then_leave() {
        let dir = tempfile::tempdir().unwrap();
        let app = open_app(&dir).await;

        app.invite("companion-1", "Blue Bird", "Ikimono-gakari")
            .await
            .unwrap();
        let record = app.storage.get().await.unwrap().unwrap();
        assert_eq!(record.partner_id, "companion-1");
        assert_eq!(record.track_title, "Blue Bird");

        app.leave().await.unwrap();
        assert!(app.storage.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn mode_changes_persist() {
        let dir = tempfile::tempdir().unwrap();
        let app = open_app(&dir).await;

        app.toggle_mode().await.unwrap();
        assert_eq!(
            app.storage.play_mode().await.unwrap(),
            Some(PlayMode::RepeatOne)
        );

        app.set_mode(PlayMode::Sequence).await.unwrap();
        assert_eq!(
            app.storage.play_mode().await.unwrap(),
            Some(PlayMode::Sequence)
        );
    }
}
