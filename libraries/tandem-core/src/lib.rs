//! Tandem Core
//!
//! Platform-agnostic types, store traits, and error handling for Tandem,
//! the listen-together playback engine.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `PlayMode`, `SessionRecord`, `Candidate`
//! - **Store Traits**: `LibraryStore`, `PreferenceStore`, `SessionStore`
//! - **Remote Search Trait**: `TrackSearch`
//! - **Error Handling**: Unified `TandemError` and `Result` types
//!
//! Concrete stores live in `tandem-storage` (SQLite) and in [`memory`]
//! (in-process, for tests and embedding).
//!
//! # Example
//!
//! ```rust
//! use tandem_core::{PlayMode, Track};
//!
//! let track = Track::new("t1", "Song", "Artist").with_stream_locator("https://cdn/t1.mp3");
//! assert!(track.is_resolved());
//!
//! assert_eq!(PlayMode::default(), PlayMode::RepeatAll);
//! assert_eq!(PlayMode::RepeatAll.next(), PlayMode::RepeatOne);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod memory;
pub mod traits;
pub mod types;

pub use error::{Result, TandemError};
pub use traits::{LibraryStore, PreferenceStore, SessionStore, TrackSearch};
pub use types::{
    Candidate, Initiator, ListeningDuration, PlayMode, SessionRecord, Track, TrackChange,
};
