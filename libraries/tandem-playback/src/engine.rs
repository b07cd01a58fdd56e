//! Engine facade
//!
//! A single tokio task owns the playlist, the playback controller and the
//! play-mode cache. Every operation, backend report and finished remote
//! resolve is applied by that task in arrival order, so no caller or callback
//! ever sees a half-applied change. Collaborators talk to it through the
//! cloneable [`EngineHandle`].
//!
//! Backend reports are drained before queued commands, which makes a
//! completion that was already delivered take effect before any command sent
//! after it.

use crate::backend::{AudioBackend, BackendEvent, BackendEventReceiver};
use crate::controller::PlaybackController;
use crate::error::{PlaybackError, Result};
use crate::events::PlaybackEvent;
use crate::policy::{self, Direction, NextAction};
use crate::request::TrackChangeRequest;
use crate::resolver::TrackResolver;
use crate::sync::SessionSynchronizer;
use crate::types::{EngineConfig, PlaybackSnapshot, ResolvePolicy};
use std::sync::Arc;
use tandem_core::memory::{MemoryLibraryStore, MemoryPreferenceStore, MemorySessionStore};
use tandem_core::{
    Initiator, LibraryStore, PlayMode, PreferenceStore, SessionStore, Track, TrackSearch,
};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

type Reply<T> = oneshot::Sender<Result<T>>;

enum Command {
    SetPlaylist { tracks: Vec<Track>, reply: Reply<()> },
    AppendTracks { tracks: Vec<Track>, reply: Reply<()> },
    LoadLibrary { reply: Reply<usize> },
    SetCurrentTrack { index: usize, initiator: Initiator, reply: Reply<()> },
    Play { reply: Reply<()> },
    Pause { reply: Reply<()> },
    TogglePlay { reply: Reply<bool> },
    Navigate { direction: Direction, reply: Reply<Track> },
    Seek { seconds: f64, reply: Reply<f64> },
    SetVolume { level: f32, reply: Reply<f32> },
    RequestTrack { request: TrackChangeRequest, reply: Reply<Track> },
    TogglePlayMode { reply: Reply<PlayMode> },
    SetPlayMode { mode: PlayMode, reply: Reply<()> },
    Snapshot { reply: Reply<PlaybackSnapshot> },
    Shutdown { reply: oneshot::Sender<()> },
}

/// A finished remote resolve, handed back to the engine task
struct Resolved {
    request_id: u64,
    result: Result<Track>,
    reply: Reply<Track>,
}

/// Collaborators the engine is built from
pub struct EngineParts {
    pub backend: Box<dyn AudioBackend>,
    pub backend_events: BackendEventReceiver,
    pub library: Arc<dyn LibraryStore>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub session: Arc<dyn SessionStore>,
    pub search: Option<Arc<dyn TrackSearch>>,
}

impl EngineParts {
    /// Parts with in-memory stores and no remote search
    pub fn new(backend: Box<dyn AudioBackend>, backend_events: BackendEventReceiver) -> Self {
        Self {
            backend,
            backend_events,
            library: Arc::new(MemoryLibraryStore::new()),
            preferences: Arc::new(MemoryPreferenceStore::new()),
            session: Arc::new(MemorySessionStore::new()),
            search: None,
        }
    }

    #[must_use]
    pub fn with_library(mut self, library: Arc<dyn LibraryStore>) -> Self {
        self.library = library;
        self
    }

    #[must_use]
    pub fn with_preferences(mut self, preferences: Arc<dyn PreferenceStore>) -> Self {
        self.preferences = preferences;
        self
    }

    #[must_use]
    pub fn with_session(mut self, session: Arc<dyn SessionStore>) -> Self {
        self.session = session;
        self
    }

    #[must_use]
    pub fn with_search(mut self, search: Arc<dyn TrackSearch>) -> Self {
        self.search = Some(search);
        self
    }
}

/// The engine task state
pub struct PlaybackEngine {
    playlist: Vec<Track>,
    current_track: Option<Track>,
    current_index: Option<usize>,
    play_mode: PlayMode,
    controller: PlaybackController,
    resolver: TrackResolver,
    synchronizer: SessionSynchronizer,
    library: Arc<dyn LibraryStore>,
    preferences: Arc<dyn PreferenceStore>,
    resolve_policy: ResolvePolicy,
    latest_request_id: u64,
    last_is_playing: bool,
    commands: mpsc::Receiver<Command>,
    backend_events: BackendEventReceiver,
    resolved_tx: mpsc::UnboundedSender<Resolved>,
    resolved_rx: mpsc::UnboundedReceiver<Resolved>,
    events: broadcast::Sender<PlaybackEvent>,
    state: watch::Sender<PlaybackSnapshot>,
}

impl PlaybackEngine {
    /// Start the engine task and return a handle to it
    ///
    /// The persisted play mode is read once here; `repeat-all` is used on
    /// first run or if the preference cannot be read.
    pub async fn spawn(parts: EngineParts, config: EngineConfig) -> EngineHandle {
        let play_mode = match parts.preferences.play_mode().await {
            Ok(mode) => mode.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Failed to read play mode, using default");
                PlayMode::default()
            }
        };

        let (command_tx, command_rx) = mpsc::channel(config.command_capacity.max(1));
        let (events, events_rx) = broadcast::channel(config.event_capacity.max(1));
        let (resolved_tx, resolved_rx) = mpsc::unbounded_channel();
        let (state, state_rx) = watch::channel(PlaybackSnapshot::default());

        let resolver = parts
            .search
            .map_or_else(TrackResolver::local_only, TrackResolver::new);

        let mut engine = Self {
            playlist: Vec::new(),
            current_track: None,
            current_index: None,
            play_mode,
            controller: PlaybackController::new(parts.backend, config.volume),
            resolver,
            synchronizer: SessionSynchronizer::new(parts.session),
            library: parts.library,
            preferences: parts.preferences,
            resolve_policy: config.resolve_policy,
            latest_request_id: 0,
            last_is_playing: false,
            commands: command_rx,
            backend_events: parts.backend_events,
            resolved_tx,
            resolved_rx,
            events,
            state,
        };
        engine.publish_snapshot();

        tokio::spawn(engine.run());

        EngineHandle {
            commands: command_tx,
            events: events_rx,
            state: state_rx,
        }
    }

    async fn run(mut self) {
        info!(mode = %self.play_mode, "Playback engine started");
        let mut shutdown_reply = None;

        loop {
            tokio::select! {
                biased;

                Some(event) = self.backend_events.recv() => self.handle_backend_event(event).await,

                Some(resolved) = self.resolved_rx.recv() => self.handle_resolved(resolved).await,

                command = self.commands.recv() => match command {
                    Some(Command::Shutdown { reply }) => {
                        shutdown_reply = Some(reply);
                        break;
                    }
                    Some(command) => self.handle_command(command).await,
                    None => break,
                },
            }
        }

        self.controller.pause();
        info!("Playback engine stopped");

        // Release the backend and channels before acknowledging
        drop(self);
        if let Some(reply) = shutdown_reply {
            let _ = reply.send(());
        }
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::SetPlaylist { tracks, reply } => {
                self.set_playlist(tracks);
                let _ = reply.send(Ok(()));
            }
            Command::AppendTracks { tracks, reply } => {
                self.append_tracks(tracks);
                let _ = reply.send(Ok(()));
            }
            Command::LoadLibrary { reply } => {
                let _ = reply.send(self.load_library().await);
            }
            Command::SetCurrentTrack {
                index,
                initiator,
                reply,
            } => {
                let _ = reply.send(self.set_current_track(index, initiator).await);
            }
            Command::Play { reply } => {
                let _ = reply.send(self.play());
            }
            Command::Pause { reply } => {
                let _ = reply.send(self.pause());
            }
            Command::TogglePlay { reply } => {
                let _ = reply.send(self.toggle_play());
            }
            Command::Navigate { direction, reply } => {
                let _ = reply.send(self.navigate(direction).await);
            }
            Command::Seek { seconds, reply } => {
                let _ = reply.send(self.seek(seconds));
            }
            Command::SetVolume { level, reply } => {
                let level = self.controller.set_volume(level);
                self.publish_snapshot();
                let _ = reply.send(Ok(level));
            }
            Command::RequestTrack { request, reply } => {
                self.request_track(request, reply).await;
            }
            Command::TogglePlayMode { reply } => {
                let _ = reply.send(self.toggle_play_mode().await);
            }
            Command::SetPlayMode { mode, reply } => {
                let _ = reply.send(self.set_play_mode(mode).await);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(Ok(self.snapshot()));
            }
            Command::Shutdown { reply } => {
                let _ = reply.send(());
            }
        }
    }

    // ===== Playlist =====

    fn set_playlist(&mut self, tracks: Vec<Track>) {
        self.playlist = tracks;
        self.current_index = self.rederive_index();
        debug!(
            length = self.playlist.len(),
            index = ?self.current_index,
            "Playlist replaced"
        );
        self.emit(PlaybackEvent::PlaylistChanged {
            length: self.playlist.len(),
        });
        self.publish_snapshot();
    }

    fn append_tracks(&mut self, tracks: Vec<Track>) {
        self.playlist.extend(tracks);
        self.emit(PlaybackEvent::PlaylistChanged {
            length: self.playlist.len(),
        });
        self.publish_snapshot();
    }

    async fn load_library(&mut self) -> Result<usize> {
        let tracks = self.library.load_all().await?;
        let count = tracks.len();
        info!(count, "Loaded library into playlist");
        self.set_playlist(tracks);
        Ok(count)
    }

    /// Append one track to the playlist; returns its index
    fn push_track(&mut self, track: Track) -> usize {
        self.playlist.push(track);
        self.emit(PlaybackEvent::PlaylistChanged {
            length: self.playlist.len(),
        });
        self.playlist.len() - 1
    }

    /// Find the current track in a replaced playlist
    fn rederive_index(&self) -> Option<usize> {
        let current = self.current_track.as_ref()?;
        let still_valid = self
            .current_index
            .and_then(|i| self.playlist.get(i))
            .is_some_and(|track| track.id == current.id);

        if still_valid {
            self.current_index
        } else {
            self.playlist.iter().position(|track| track.id == current.id)
        }
    }

    // ===== Track selection =====

    async fn set_current_track(&mut self, index: usize, initiator: Initiator) -> Result<()> {
        let track = self
            .playlist
            .get(index)
            .cloned()
            .ok_or(PlaybackError::IndexOutOfBounds(index))?;
        let result = self.change_track(Some(index), track, initiator).await;
        self.publish_snapshot();
        result
    }

    /// Make `track` current and load it, then sync the session record
    ///
    /// State is updated before the load and restored if the load fails, so
    /// the previous track keeps playing. The session write happens only once
    /// the controller has accepted the load. A failed session write is logged
    /// and does not fail the change. Callers publish the snapshot once the
    /// whole operation is applied.
    async fn change_track(
        &mut self,
        index: Option<usize>,
        track: Track,
        initiator: Initiator,
    ) -> Result<()> {
        if !track.is_resolved() {
            return Err(PlaybackError::InvalidTrack(track.id));
        }

        let previous_track = self.current_track.replace(track.clone());
        let previous_index = std::mem::replace(&mut self.current_index, index);

        if let Err(e) = self.controller.load(&track) {
            warn!(track_id = %track.id, error = %e, "Failed to load track");
            self.current_track = previous_track;
            self.current_index = previous_index;
            return Err(e);
        }

        info!(
            track_id = %track.id,
            title = %track.title,
            artist = %track.artist,
            index = ?index,
            initiator = %initiator,
            "Track changed"
        );

        if let Err(e) = self.synchronizer.on_track_changed(&track, initiator).await {
            warn!(track_id = %track.id, error = %e, "Failed to sync session record");
        }

        self.emit(PlaybackEvent::TrackChanged {
            track,
            index,
            initiator,
        });
        Ok(())
    }

    /// Change track and start playing it
    async fn start_track(
        &mut self,
        index: Option<usize>,
        track: Track,
        initiator: Initiator,
    ) -> Result<Track> {
        let result = match self.change_track(index, track.clone(), initiator).await {
            Ok(()) => self.controller.play(),
            Err(e) => Err(e),
        };
        self.publish_snapshot();
        result.map(|()| track)
    }

    async fn navigate(&mut self, direction: Direction) -> Result<Track> {
        let index = policy::step(self.playlist.len(), self.current_index, direction)
            .ok_or(PlaybackError::EmptyPlaylist)?;
        let track = self
            .playlist
            .get(index)
            .cloned()
            .ok_or(PlaybackError::IndexOutOfBounds(index))?;

        let was_playing = self.controller.is_playing();
        let result = match self
            .change_track(Some(index), track.clone(), Initiator::User)
            .await
        {
            Ok(()) if was_playing => self.controller.play(),
            other => other,
        };
        self.publish_snapshot();
        result.map(|()| track)
    }

    // ===== Transport =====

    fn play(&mut self) -> Result<()> {
        let result = self.controller.play();
        self.publish_snapshot();
        result
    }

    fn pause(&mut self) -> Result<()> {
        if !self.controller.is_loaded() {
            return Err(PlaybackError::NotLoaded);
        }
        self.controller.pause();
        self.publish_snapshot();
        Ok(())
    }

    fn toggle_play(&mut self) -> Result<bool> {
        if self.controller.is_playing() {
            self.pause()?;
        } else {
            self.play()?;
        }
        Ok(self.controller.is_playing())
    }

    fn seek(&mut self, seconds: f64) -> Result<f64> {
        let position = self.controller.seek(seconds)?;
        self.emit_position();
        self.publish_snapshot();
        Ok(position)
    }

    // ===== Track requests =====

    /// Play a track by name
    ///
    /// A playlist hit starts immediately. A library hit is appended to the
    /// playlist and started. A miss is resolved remotely on a separate task;
    /// the result comes back through `resolved_rx` and the reply is sent from
    /// [`Self::handle_resolved`]. Every request counts as the latest one,
    /// whichever path it takes.
    async fn request_track(&mut self, request: TrackChangeRequest, reply: Reply<Track>) {
        self.latest_request_id += 1;
        let request_id = self.latest_request_id;

        if let Some((index, track)) =
            TrackResolver::find_local(&self.playlist, &request.title, &request.artist)
        {
            debug!(track_id = %track.id, index, "Requested track found in playlist");
            let _ = reply.send(self.start_track(Some(index), track, Initiator::System).await);
            return;
        }

        match self.library.find(&request.title, &request.artist).await {
            Ok(Some(track)) if track.is_resolved() => {
                debug!(track_id = %track.id, "Requested track found in library");
                let index = self.push_track(track.clone());
                let _ = reply.send(self.start_track(Some(index), track, Initiator::System).await);
                return;
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Library lookup failed, resolving remotely"),
        }

        debug!(
            request_id,
            title = %request.title,
            artist = %request.artist,
            "Requested track not in playlist, resolving remotely"
        );

        let resolver = self.resolver.clone();
        let resolved_tx = self.resolved_tx.clone();
        tokio::spawn(async move {
            let result = resolver.resolve_remote(&request.title, &request.artist).await;
            let _ = resolved_tx.send(Resolved {
                request_id,
                result,
                reply,
            });
        });
    }

    async fn handle_resolved(&mut self, resolved: Resolved) {
        let Resolved {
            request_id,
            result,
            reply,
        } = resolved;

        if self.resolve_policy == ResolvePolicy::LatestRequest
            && request_id != self.latest_request_id
        {
            debug!(
                request_id,
                latest = self.latest_request_id,
                "Discarding superseded resolve"
            );
            let _ = reply.send(Err(PlaybackError::Superseded));
            return;
        }

        let track = match result {
            Ok(track) => track,
            Err(e) => {
                info!(request_id, error = %e, "Track request failed");
                let _ = reply.send(Err(e));
                return;
            }
        };

        let index = self.push_track(track.clone());

        if let Err(e) = self.library.append(&track).await {
            warn!(track_id = %track.id, error = %e, "Failed to persist resolved track");
        }

        let _ = reply.send(self.start_track(Some(index), track, Initiator::System).await);
    }

    // ===== Play mode =====

    async fn toggle_play_mode(&mut self) -> Result<PlayMode> {
        let stored = self.preferences.play_mode().await?.unwrap_or_default();
        let next = stored.next();
        self.preferences.set_play_mode(next).await?;
        self.apply_play_mode(next);
        Ok(next)
    }

    async fn set_play_mode(&mut self, mode: PlayMode) -> Result<()> {
        self.preferences.set_play_mode(mode).await?;
        self.apply_play_mode(mode);
        Ok(())
    }

    fn apply_play_mode(&mut self, mode: PlayMode) {
        info!(mode = %mode, "Play mode changed");
        self.play_mode = mode;
        self.emit(PlaybackEvent::PlayModeChanged { mode });
        self.publish_snapshot();
    }

    // ===== Backend reports =====

    async fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::TimeUpdated { track_id, position } => {
                if self.controller.on_time_updated(&track_id, position) {
                    self.emit_position();
                    self.publish_snapshot();
                } else {
                    trace!(track_id = %track_id, "Ignoring position for stale track");
                }
            }
            BackendEvent::Completed { track_id } => self.on_completed(track_id).await,
        }
    }

    async fn on_completed(&mut self, track_id: String) {
        if !self.controller.on_completed(&track_id) {
            warn!(track_id = %track_id, "Discarding completion for a track that is no longer current");
            return;
        }
        self.emit(PlaybackEvent::TrackFinished { track_id });

        let action = policy::on_completion(self.play_mode, self.playlist.len(), self.current_index);
        debug!(?action, mode = %self.play_mode, "Track completed");

        let result = match action {
            NextAction::Nothing | NextAction::Stop => Ok(()),
            NextAction::Restart => self.restart_current(),
            NextAction::Play(index) => match self.playlist.get(index).cloned() {
                Some(track) => self
                    .start_track(Some(index), track, Initiator::System)
                    .await
                    .map(|_| ()),
                None => Err(PlaybackError::IndexOutOfBounds(index)),
            },
        };

        if let Err(e) = result {
            warn!(error = %e, "Failed to advance after completion");
            self.emit(PlaybackEvent::Error {
                message: e.to_string(),
            });
        }
        self.publish_snapshot();
    }

    fn restart_current(&mut self) -> Result<()> {
        let track = self.current_track.clone().ok_or(PlaybackError::NotLoaded)?;
        self.controller.load(&track)?;
        self.controller.play()
    }

    // ===== Observation =====

    fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_track: self.current_track.clone(),
            current_index: self.current_index,
            is_playing: self.controller.is_playing(),
            position_secs: self.controller.position().as_secs_f64(),
            duration_secs: self.controller.duration().as_secs_f64(),
            volume: self.controller.volume(),
            playlist: self.playlist.clone(),
            play_mode: self.play_mode,
        }
    }

    fn emit(&self, event: PlaybackEvent) {
        // No receivers is fine
        let _ = self.events.send(event);
    }

    fn emit_position(&self) {
        self.emit(PlaybackEvent::PositionUpdate {
            position_ms: self.controller.position().as_millis() as u64,
            duration_ms: self.controller.duration().as_millis() as u64,
        });
    }

    /// Publish the current state to watchers, emitting `StateChanged` when
    /// the playing flag flipped since the last publish
    fn publish_snapshot(&mut self) {
        let is_playing = self.controller.is_playing();
        if is_playing != self.last_is_playing {
            self.last_is_playing = is_playing;
            self.emit(PlaybackEvent::StateChanged { is_playing });
        }
        self.state.send_replace(self.snapshot());
    }
}

/// Cloneable handle to a running engine
///
/// Holds no event sender, so event receivers see `Closed` once the engine
/// task stops even while handles are still alive.
pub struct EngineHandle {
    commands: mpsc::Sender<Command>,
    events: broadcast::Receiver<PlaybackEvent>,
    state: watch::Receiver<PlaybackSnapshot>,
}

impl Clone for EngineHandle {
    fn clone(&self) -> Self {
        Self {
            commands: self.commands.clone(),
            events: self.events.resubscribe(),
            state: self.state.clone(),
        }
    }
}

impl EngineHandle {
    async fn request<T>(&self, make: impl FnOnce(Reply<T>) -> Command) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(make(reply))
            .await
            .map_err(|_| PlaybackError::EngineStopped)?;
        response.await.map_err(|_| PlaybackError::EngineStopped)?
    }

    /// Replace the playlist; playback is not interrupted
    pub async fn set_playlist(&self, tracks: Vec<Track>) -> Result<()> {
        self.request(|reply| Command::SetPlaylist { tracks, reply })
            .await
    }

    /// Append tracks to the playlist
    pub async fn append_tracks(&self, tracks: Vec<Track>) -> Result<()> {
        self.request(|reply| Command::AppendTracks { tracks, reply })
            .await
    }

    /// Replace the playlist with the persisted library; returns its size
    pub async fn load_library(&self) -> Result<usize> {
        self.request(|reply| Command::LoadLibrary { reply }).await
    }

    /// Make the playlist entry at `index` current and load it (does not play)
    pub async fn set_current_track(&self, index: usize, initiator: Initiator) -> Result<()> {
        self.request(|reply| Command::SetCurrentTrack {
            index,
            initiator,
            reply,
        })
        .await
    }

    pub async fn play(&self) -> Result<()> {
        self.request(|reply| Command::Play { reply }).await
    }

    pub async fn pause(&self) -> Result<()> {
        self.request(|reply| Command::Pause { reply }).await
    }

    /// Toggle between playing and paused; returns the new playing flag
    pub async fn toggle_play(&self) -> Result<bool> {
        self.request(|reply| Command::TogglePlay { reply }).await
    }

    /// Move one slot forward (wrapping), independent of play mode
    #[allow(clippy::should_implement_trait)]
    pub async fn next(&self) -> Result<Track> {
        self.request(|reply| Command::Navigate {
            direction: Direction::Forward,
            reply,
        })
        .await
    }

    /// Move one slot back (wrapping), independent of play mode
    pub async fn previous(&self) -> Result<Track> {
        self.request(|reply| Command::Navigate {
            direction: Direction::Backward,
            reply,
        })
        .await
    }

    /// Seek within the current track; returns the clamped position in seconds
    pub async fn seek(&self, seconds: f64) -> Result<f64> {
        self.request(|reply| Command::Seek { seconds, reply }).await
    }

    /// Set the volume; returns the clamped level
    pub async fn set_volume(&self, level: f32) -> Result<f32> {
        self.request(|reply| Command::SetVolume { level, reply })
            .await
    }

    /// Resolve a track by name and play it
    pub async fn request_track_by_name(&self, title: &str, artist: &str) -> Result<Track> {
        self.request_track(TrackChangeRequest::new(title, artist))
            .await
    }

    /// Resolve a track-change request and play the result
    pub async fn request_track(&self, request: TrackChangeRequest) -> Result<Track> {
        self.request(|reply| Command::RequestTrack { request, reply })
            .await
    }

    /// Advance the persisted play mode; returns the new mode
    pub async fn toggle_play_mode(&self) -> Result<PlayMode> {
        self.request(|reply| Command::TogglePlayMode { reply }).await
    }

    pub async fn set_play_mode(&self, mode: PlayMode) -> Result<()> {
        self.request(|reply| Command::SetPlayMode { mode, reply })
            .await
    }

    /// Current state, after everything queued before this call was applied
    pub async fn snapshot(&self) -> Result<PlaybackSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Receiver that always holds the latest published state
    pub fn watch_state(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.state.clone()
    }

    /// Subscribe to all playback events
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.resubscribe()
    }

    /// Call `callback` for every track change until the guard is dropped
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_track_changed<F>(&self, callback: F) -> TrackChangedSubscription
    where
        F: Fn(&Track, Initiator) + Send + 'static,
    {
        let mut events = self.events.resubscribe();
        let task = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(PlaybackEvent::TrackChanged {
                        track, initiator, ..
                    }) => callback(&track, initiator),
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Track change listener lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        TrackChangedSubscription { task }
    }

    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }

    /// Stop the engine task; pending track requests fail with `EngineStopped`
    pub async fn shutdown(&self) {
        let (reply, done) = oneshot::channel();
        if self.commands.send(Command::Shutdown { reply }).await.is_ok() {
            let _ = done.await;
        }
    }
}

/// Guard returned by [`EngineHandle::on_track_changed`]
#[must_use = "the listener stops when the subscription is dropped"]
pub struct TrackChangedSubscription {
    task: JoinHandle<()>,
}

impl Drop for TrackChangedSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}
