//! Search-and-resolve HTTP client.

use crate::error::{Result, SearchClientError};
use crate::types::{SearchConfig, SearchResponse, SongHit, SongUrlResponse};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tandem_core::{Candidate, TrackSearch};
use tracing::{debug, warn};
use url::Url;

/// Client for the online search service.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: Client,
    base_url: String,
}

impl SearchClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SearchConfig) -> Result<Self> {
        if config.url.trim().is_empty() {
            return Err(SearchClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let base_url = config.url.trim().trim_end_matches('/').to_string();
        let parsed =
            Url::parse(&base_url).map_err(|e| SearchClientError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SearchClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(5))
            .user_agent(format!("Tandem/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base_url })
    }

    /// Get the normalized base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search songs by free-text keywords.
    pub async fn search_songs(&self, keywords: &str) -> Result<Vec<SongHit>> {
        let url = format!("{}/search", self.base_url);
        debug!(url = %url, keywords = %keywords, "Searching songs");

        let response = self
            .http
            .get(&url)
            .query(&[("keywords", keywords)])
            .send()
            .await
            .map_err(map_send_error)?;

        let response = check_status(response).await?;
        let body: SearchResponse = response.json().await.map_err(|e| {
            SearchClientError::ParseError(format!("Failed to parse search response: {}", e))
        })?;

        debug!(results = body.songs.len(), "Search complete");
        Ok(body.songs)
    }

    /// Get a playable URL for a song, `None` if the service has none.
    pub async fn song_url(&self, id: &str) -> Result<Option<String>> {
        let url = format!("{}/song/url", self.base_url);
        debug!(url = %url, song_id = %id, "Fetching song url");

        let response = self
            .http
            .get(&url)
            .query(&[("id", id)])
            .send()
            .await
            .map_err(map_send_error)?;

        let response = check_status(response).await?;
        let body: SongUrlResponse = response.json().await.map_err(|e| {
            SearchClientError::ParseError(format!("Failed to parse song url response: {}", e))
        })?;

        let locator = body.url.filter(|u| !u.trim().is_empty());
        if locator.is_none() {
            warn!(song_id = %id, "Service returned no playable url");
        }
        Ok(locator)
    }
}

#[async_trait]
impl TrackSearch for SearchClient {
    async fn search(&self, query: &str) -> tandem_core::Result<Vec<Candidate>> {
        let hits = self.search_songs(query).await?;
        Ok(hits.into_iter().map(Candidate::from).collect())
    }

    async fn stream_locator(&self, candidate_id: &str) -> tandem_core::Result<Option<String>> {
        Ok(self.song_url(candidate_id).await?)
    }
}

fn map_send_error(e: reqwest::Error) -> SearchClientError {
    if e.is_connect() || e.is_timeout() {
        SearchClientError::ServiceUnreachable(e.to_string())
    } else {
        SearchClientError::Request(e)
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);
        return Err(SearchClientError::RateLimited { retry_after_secs });
    }

    let message = response.text().await.unwrap_or_default();
    Err(SearchClientError::ServerError {
        status: status.as_u16(),
        message,
    })
}
