//! Playback controller
//!
//! Owns the single audio resource and the playing/position/volume state
//! derived from it. Every load is tagged with the track id, and backend events
//! for any other id are rejected.

use crate::backend::AudioBackend;
use crate::error::{PlaybackError, Result};
use std::time::Duration;
use tandem_core::Track;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
struct Loaded {
    track_id: String,
    duration: Duration,
}

/// Single-resource playback controller
pub struct PlaybackController {
    backend: Box<dyn AudioBackend>,
    loaded: Option<Loaded>,
    is_playing: bool,
    position: Duration,
    volume: f32,
}

impl PlaybackController {
    /// Create a controller over `backend` with an initial volume
    pub fn new(backend: Box<dyn AudioBackend>, volume: f32) -> Self {
        let mut controller = Self {
            backend,
            loaded: None,
            is_playing: false,
            position: Duration::ZERO,
            volume: 0.0,
        };
        controller.set_volume(volume);
        controller
    }

    /// Bind the resource to `track`'s stream locator
    ///
    /// Leaves the controller paused at position zero. Fails with
    /// `InvalidTrack` if the track has no locator. When the backend refuses
    /// the load, the previous track stays loaded with its playing state.
    pub fn load(&mut self, track: &Track) -> Result<()> {
        let locator = match track.stream_locator.as_deref() {
            Some(locator) if track.is_resolved() => locator,
            _ => return Err(PlaybackError::InvalidTrack(track.id.clone())),
        };

        let duration = self
            .backend
            .load(&track.id, locator, track.duration())
            .map_err(|e| match e {
                PlaybackError::InvalidTrack(_) => e,
                other => PlaybackError::PlaybackStartFailure(other.to_string()),
            })?;

        debug!(track_id = %track.id, ?duration, "Track loaded");
        self.loaded = Some(Loaded {
            track_id: track.id.clone(),
            duration,
        });
        self.is_playing = false;
        self.position = Duration::ZERO;
        Ok(())
    }

    /// Start or resume playback
    pub fn play(&mut self) -> Result<()> {
        if self.loaded.is_none() {
            return Err(PlaybackError::NotLoaded);
        }
        if self.is_playing {
            return Ok(());
        }

        match self.backend.play() {
            Ok(()) => {
                self.is_playing = true;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Backend failed to start playback");
                self.is_playing = false;
                Err(PlaybackError::PlaybackStartFailure(e.to_string()))
            }
        }
    }

    /// Pause playback; no-op when already paused
    pub fn pause(&mut self) {
        if !self.is_playing {
            return;
        }
        self.backend.pause();
        self.is_playing = false;
    }

    /// Seek to `seconds`, clamped to `[0, duration]`
    ///
    /// Returns the position actually applied. Playing state is unchanged.
    pub fn seek(&mut self, seconds: f64) -> Result<f64> {
        let duration = self
            .loaded
            .as_ref()
            .map(|loaded| loaded.duration)
            .ok_or(PlaybackError::NotLoaded)?;

        let seconds = if seconds.is_nan() { 0.0 } else { seconds };
        let target = Duration::from_secs_f64(seconds.clamp(0.0, duration.as_secs_f64()));

        self.backend.seek(target);
        self.position = target;
        Ok(target.as_secs_f64())
    }

    /// Set volume, clamped to `[0, 1]`; returns the applied level
    pub fn set_volume(&mut self, level: f32) -> f32 {
        let level = if level.is_nan() { 0.0 } else { level.clamp(0.0, 1.0) };
        self.backend.set_volume(level);
        self.volume = level;
        level
    }

    /// Apply a position report; `false` if it is for a track not loaded
    pub fn on_time_updated(&mut self, track_id: &str, position: Duration) -> bool {
        if !self.is_current(track_id) {
            return false;
        }
        self.position = position;
        true
    }

    /// Apply a completion report; `false` if it is for a track not loaded
    pub fn on_completed(&mut self, track_id: &str) -> bool {
        let Some(loaded) = self.loaded.as_ref().filter(|l| l.track_id == track_id) else {
            return false;
        };
        self.position = loaded.duration;
        self.is_playing = false;
        true
    }

    pub fn is_current(&self, track_id: &str) -> bool {
        self.loaded
            .as_ref()
            .is_some_and(|loaded| loaded.track_id == track_id)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn duration(&self) -> Duration {
        self.loaded
            .as_ref()
            .map_or(Duration::ZERO, |loaded| loaded.duration)
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Calls {
        log: Vec<String>,
        fail_play: bool,
        fail_load: bool,
    }

    struct StubBackend(Arc<Mutex<Calls>>);

    impl AudioBackend for StubBackend {
        fn load(&mut self, track_id: &str, _locator: &str, hint: Duration) -> Result<Duration> {
            let mut calls = self.0.lock().unwrap();
            calls.log.push(format!("load:{track_id}"));
            if calls.fail_load {
                Err(PlaybackError::PlaybackStartFailure("unsupported format".into()))
            } else {
                Ok(hint)
            }
        }

        fn play(&mut self) -> Result<()> {
            let mut calls = self.0.lock().unwrap();
            calls.log.push("play".into());
            if calls.fail_play {
                Err(PlaybackError::PlaybackStartFailure("device busy".into()))
            } else {
                Ok(())
            }
        }

        fn pause(&mut self) {
            self.0.lock().unwrap().log.push("pause".into());
        }

        fn seek(&mut self, position: Duration) {
            self.0.lock().unwrap().log.push(format!("seek:{}", position.as_secs()));
        }

        fn set_volume(&mut self, _level: f32) {}
    }

    fn controller() -> (PlaybackController, Arc<Mutex<Calls>>) {
        let calls = Arc::new(Mutex::new(Calls::default()));
        let backend = StubBackend(Arc::clone(&calls));
        (PlaybackController::new(Box::new(backend), 0.5), calls)
    }

    fn track(id: &str) -> Track {
        Track::new(id, "Title", "Artist")
            .with_stream_locator(format!("https://cdn/{id}.mp3"))
            .with_duration(Duration::from_secs(200))
    }

    #[test]
    fn load_rejects_placeholder() {
        let (mut c, calls) = controller();
        let placeholder = Track::new("p", "Title", "Artist");

        assert_eq!(c.load(&placeholder), Err(PlaybackError::InvalidTrack("p".into())));
        assert!(!c.is_loaded());
        assert!(calls.lock().unwrap().log.is_empty());
    }

    #[test]
    fn play_requires_load() {
        let (mut c, _) = controller();
        assert_eq!(c.play(), Err(PlaybackError::NotLoaded));
        assert!(!c.is_playing());
    }

    #[test]
    fn play_pause_cycle() {
        let (mut c, calls) = controller();
        c.load(&track("a")).unwrap();
        c.play().unwrap();
        assert!(c.is_playing());

        c.pause();
        c.pause();
        assert!(!c.is_playing());
        assert_eq!(calls.lock().unwrap().log, vec!["load:a", "play", "pause"]);
    }

    #[test]
    fn start_failure_leaves_track_loaded_but_not_playing() {
        let (mut c, calls) = controller();
        calls.lock().unwrap().fail_play = true;
        c.load(&track("a")).unwrap();

        assert!(matches!(c.play(), Err(PlaybackError::PlaybackStartFailure(_))));
        assert!(!c.is_playing());
        assert!(c.is_current("a"));
    }

    #[test]
    fn failed_load_keeps_previous_track_playing() {
        let (mut c, calls) = controller();
        c.load(&track("a")).unwrap();
        c.play().unwrap();
        c.seek(30.0).unwrap();
        calls.lock().unwrap().fail_load = true;

        assert!(matches!(
            c.load(&track("b")),
            Err(PlaybackError::PlaybackStartFailure(_))
        ));
        assert!(c.is_current("a"));
        assert!(!c.is_current("b"));
        assert!(c.is_playing());
        assert_eq!(c.position(), Duration::from_secs(30));
        assert!(c.on_completed("a"));
    }

    #[test]
    fn seek_clamps_and_keeps_playing_state() {
        let (mut c, _) = controller();
        c.load(&track("a")).unwrap();
        c.play().unwrap();

        assert_eq!(c.seek(-5.0).unwrap(), 0.0);
        assert_eq!(c.seek(1_000.0).unwrap(), 200.0);
        assert_eq!(c.seek(f64::NAN).unwrap(), 0.0);
        assert_eq!(c.seek(42.5).unwrap(), 42.5);
        assert!(c.is_playing());
    }

    #[test]
    fn volume_clamps() {
        let (mut c, _) = controller();
        assert_eq!(c.volume(), 0.5);
        assert_eq!(c.set_volume(1.7), 1.0);
        assert_eq!(c.set_volume(-0.1), 0.0);
        assert_eq!(c.set_volume(f32::NAN), 0.0);
    }

    #[test]
    fn stale_events_rejected() {
        let (mut c, _) = controller();
        c.load(&track("a")).unwrap();
        c.play().unwrap();
        c.load(&track("b")).unwrap();
        c.play().unwrap();

        assert!(!c.on_time_updated("a", Duration::from_secs(3)));
        assert!(!c.on_completed("a"));
        assert!(c.is_playing());

        assert!(c.on_completed("b"));
        assert!(!c.is_playing());
        assert_eq!(c.position(), Duration::from_secs(200));
    }
}
