//! Tandem Search Client
//!
//! HTTP client for the online search-and-resolve service the playback engine
//! falls back to when a requested track is not in the local library.
//!
//! # Features
//!
//! - **Search**: free-text query to a list of candidates
//! - **Resolve**: candidate id to a playable stream URL (or none)
//!
//! [`SearchClient`] implements `tandem_core::TrackSearch`, which is the only
//! thing the engine depends on.
//!
//! # Example
//!
//! ```ignore
//! use tandem_search_client::{SearchClient, SearchConfig};
//!
//! let client = SearchClient::new(SearchConfig::new("https://music-api.example.com"))?;
//! let songs = client.search_songs("Blue Bird Ikimono-gakari").await?;
//! if let Some(first) = songs.first() {
//!     let url = client.song_url(&first.id.to_string()).await?;
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::SearchClient;
pub use error::{Result, SearchClientError};
pub use types::{SearchConfig, SearchResponse, SongHit, SongId, SongUrlResponse};
