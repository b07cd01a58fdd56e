//! Tandem Playback
//!
//! Listen-together playback engine. Owns a playlist and a single audio
//! resource, advances through the playlist by play mode when a track
//! finishes, plays tracks requested by name (resolving them remotely when
//! they are not in the playlist), and mirrors every track change into the
//! shared session record.
//!
//! # Architecture
//!
//! - [`TrackResolver`]: local playlist lookup, then remote search
//! - [`PlaybackController`]: the single resource, driven through an
//!   [`AudioBackend`]
//! - [`policy`]: play-mode state machine
//! - [`SessionSynchronizer`]: session record updates
//! - [`PlaybackEngine`] / [`EngineHandle`]: the facade, running as one task
//!
//! # Example
//!
//! ```rust,no_run
//! use tandem_playback::{event_channel, EngineConfig, EngineParts, PlaybackEngine, SimulatedBackend};
//! use std::time::Duration;
//!
//! # async fn example() -> tandem_playback::Result<()> {
//! let (tx, rx) = event_channel();
//! let backend = SimulatedBackend::new(Duration::from_millis(250), tx);
//! let engine = PlaybackEngine::spawn(EngineParts::new(Box::new(backend), rx), EngineConfig::default()).await;
//!
//! let track = engine.request_track_by_name("Blue Bird", "Ikimono-gakari").await?;
//! println!("Now playing {}", track.title);
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod controller;
pub mod engine;
pub mod error;
pub mod events;
pub mod policy;
pub mod request;
pub mod resolver;
pub mod sync;
pub mod types;

pub use backend::{
    event_channel, AudioBackend, BackendEvent, BackendEventReceiver, BackendEventSender,
    SimulatedBackend,
};
pub use controller::PlaybackController;
pub use engine::{EngineHandle, EngineParts, PlaybackEngine, TrackChangedSubscription};
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use policy::{Direction, NextAction};
pub use request::TrackChangeRequest;
pub use resolver::TrackResolver;
pub use sync::SessionSynchronizer;
pub use types::{EngineConfig, PlaybackSnapshot, ResolvePolicy};
