//! Audio backend abstraction
//!
//! The controller drives one backend. Backends report progress through a
//! channel of [`BackendEvent`]s, each tagged with the id of the track it
//! concerns so the engine can drop events for a track that is no longer
//! current.

use crate::error::{PlaybackError, Result};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Progress reported by a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    /// Playback position advanced
    TimeUpdated { track_id: String, position: Duration },

    /// Track reached its natural end
    Completed { track_id: String },
}

/// Sender half handed to backends
pub type BackendEventSender = mpsc::UnboundedSender<BackendEvent>;

/// Receiver half consumed by the engine
pub type BackendEventReceiver = mpsc::UnboundedReceiver<BackendEvent>;

/// Create a backend event channel
pub fn event_channel() -> (BackendEventSender, BackendEventReceiver) {
    mpsc::unbounded_channel()
}

/// Platform audio output
///
/// Implementations own exactly one resource. `load` replaces whatever was
/// loaded before and leaves the new resource paused at position zero. A
/// failed `load` leaves the previous resource untouched.
pub trait AudioBackend: Send {
    /// Bind the resource to `locator`
    ///
    /// `duration_hint` is the duration known from metadata (zero if unknown).
    /// Returns the duration the backend will report completion at.
    fn load(&mut self, track_id: &str, locator: &str, duration_hint: Duration)
        -> Result<Duration>;

    /// Start or resume
    fn play(&mut self) -> Result<()>;

    /// Pause, keeping the position
    fn pause(&mut self);

    /// Move to `position` (already clamped by the caller)
    fn seek(&mut self, position: Duration);

    /// Set volume (already clamped to 0.0 - 1.0)
    fn set_volume(&mut self, level: f32);
}

/// Duration used by [`SimulatedBackend`] when a track has no known length
pub const SIMULATED_FALLBACK_DURATION: Duration = Duration::from_secs(180);

#[derive(Debug, Default)]
struct SimulatedState {
    track_id: Option<String>,
    position: Duration,
    duration: Duration,
    playing: bool,
    volume: f32,
}

/// Clock-driven backend with no audio output
///
/// Advances the position on a tokio interval while playing and reports
/// `TimeUpdated` every tick and `Completed` once at the end. Used by the CLI
/// and anywhere real output is not available.
pub struct SimulatedBackend {
    state: Arc<Mutex<SimulatedState>>,
    ticker: JoinHandle<()>,
}

impl SimulatedBackend {
    /// Create a simulated backend ticking every `tick`
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(tick: Duration, events: BackendEventSender) -> Self {
        let state = Arc::new(Mutex::new(SimulatedState::default()));
        let ticker = tokio::spawn(run_clock(Arc::clone(&state), tick, events));
        Self { state, ticker }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut SimulatedState) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }
}

impl Drop for SimulatedBackend {
    fn drop(&mut self) {
        self.ticker.abort();
    }
}

impl AudioBackend for SimulatedBackend {
    fn load(
        &mut self,
        track_id: &str,
        locator: &str,
        duration_hint: Duration,
    ) -> Result<Duration> {
        if locator.trim().is_empty() {
            return Err(PlaybackError::InvalidTrack(track_id.to_string()));
        }

        let duration = if duration_hint.is_zero() {
            SIMULATED_FALLBACK_DURATION
        } else {
            duration_hint
        };

        debug!(track_id = %track_id, locator = %locator, ?duration, "Simulated load");
        self.with_state(|state| {
            state.track_id = Some(track_id.to_string());
            state.position = Duration::ZERO;
            state.duration = duration;
            state.playing = false;
        });
        Ok(duration)
    }

    fn play(&mut self) -> Result<()> {
        self.with_state(|state| {
            if state.track_id.is_none() {
                return Err(PlaybackError::NotLoaded);
            }
            if state.position >= state.duration {
                state.position = Duration::ZERO;
            }
            state.playing = true;
            Ok(())
        })
    }

    fn pause(&mut self) {
        self.with_state(|state| state.playing = false);
    }

    fn seek(&mut self, position: Duration) {
        self.with_state(|state| state.position = position.min(state.duration));
    }

    fn set_volume(&mut self, level: f32) {
        self.with_state(|state| state.volume = level);
    }
}

async fn run_clock(state: Arc<Mutex<SimulatedState>>, tick: Duration, events: BackendEventSender) {
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let event = {
            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
            if !state.playing {
                continue;
            }
            let Some(track_id) = state.track_id.clone() else {
                continue;
            };

            state.position = (state.position + tick).min(state.duration);
            if state.position >= state.duration {
                state.playing = false;
                BackendEvent::Completed { track_id }
            } else {
                BackendEvent::TimeUpdated {
                    track_id,
                    position: state.position,
                }
            }
        };

        if events.send(event).is_err() {
            break;
        }
    }
}
