/// CLI configuration
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tandem_playback::{EngineConfig, ResolvePolicy};
use thiserror::Error;

/// File looked up in the working directory when no `--config` is given
const DEFAULT_CONFIG_FILE: &str = "tandem.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TandemConfig {
    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_search")]
    pub search: SearchSettings,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchSettings {
    /// Remote search service; requests for tracks outside the playlist and
    /// library fail with "not found" when unset
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    /// Simulated backend clock tick
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    #[serde(default = "default_volume")]
    pub volume: f32,

    #[serde(default)]
    pub resolve_policy: ResolvePolicy,
}

impl TandemConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `tandem.toml` is read when
    /// present. `TANDEM_<SECTION>__<KEY>` variables override both, e.g.
    /// `TANDEM_SEARCH__BASE_URL`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("TANDEM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Ok(settings.build()?.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.playback.tick_ms == 0 || self.playback.tick_ms > 1000 {
            return Err(ConfigError::Invalid(format!(
                "playback.tick_ms must be between 1 and 1000, got {}",
                self.playback.tick_ms
            )));
        }

        if !(0.0..=1.0).contains(&self.playback.volume) {
            return Err(ConfigError::Invalid(format!(
                "playback.volume must be between 0.0 and 1.0, got {}",
                self.playback.volume
            )));
        }

        if let Some(url) = &self.search.base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid(format!(
                    "search.base_url must be an http(s) URL, got {url:?}"
                )));
            }
        }

        if self.storage.database_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "storage.database_url is required".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for TandemConfig {
    fn default() -> Self {
        Self {
            storage: default_storage(),
            search: default_search(),
            playback: default_playback(),
        }
    }
}

impl SearchSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl PlaybackSettings {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            volume: self.volume,
            resolve_policy: self.resolve_policy,
            ..EngineConfig::default()
        }
    }
}

// Default values
fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://tandem.db".to_string()
}

fn default_search() -> SearchSettings {
    SearchSettings {
        base_url: None,
        timeout_secs: default_timeout_secs(),
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        tick_ms: default_tick_ms(),
        volume: default_volume(),
        resolve_policy: ResolvePolicy::default(),
    }
}

fn default_tick_ms() -> u64 {
    250
}

fn default_volume() -> f32 {
    0.8
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_are_valid() {
        let config = TandemConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.storage.database_url, "sqlite://tandem.db");
        assert_eq!(config.search.base_url, None);
        assert_eq!(config.search.timeout(), Duration::from_secs(10));
        assert_eq!(config.playback.tick(), Duration::from_millis(250));
        assert_eq!(config.playback.resolve_policy, ResolvePolicy::LastFinished);
    }

    #[test]
    fn loads_partial_file_with_defaults() {
        let file = write_config(
            r#"
            [search]
            base_url = "http://localhost:3000"

            [playback]
            resolve_policy = "latest-request"
            "#,
        );

        let config = TandemConfig::load(Some(file.path())).unwrap();
        assert_eq!(
            config.search.base_url.as_deref(),
            Some("http://localhost:3000")
        );
        assert_eq!(config.search.timeout_secs, 10);
        assert_eq!(config.playback.resolve_policy, ResolvePolicy::LatestRequest);
        assert_eq!(config.playback.tick_ms, 250);
        assert_eq!(config.storage.database_url, "sqlite://tandem.db");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = TandemConfig::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn engine_config_carries_playback_settings() {
        let settings = PlaybackSettings {
            tick_ms: 100,
            volume: 0.3,
            resolve_policy: ResolvePolicy::LatestRequest,
        };
        let engine = settings.engine_config();
        assert_eq!(engine.volume, 0.3);
        assert_eq!(engine.resolve_policy, ResolvePolicy::LatestRequest);
        assert_eq!(engine.event_capacity, EngineConfig::default().event_capacity);
    }

    #[test]
    fn rejects_zero_tick() {
        let mut config = TandemConfig::default();
        config.playback.tick_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_tick_slower_than_a_second() {
        let mut config = TandemConfig::default();
        config.playback.tick_ms = 1001;
        assert!(config.validate().is_err());

        config.playback.tick_ms = 1000;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_volume_out_of_range() {
        let mut config = TandemConfig::default();
        config.playback.volume = 1.5;
        assert!(config.validate().is_err());

        config.playback.volume = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_http_search_url() {
        let mut config = TandemConfig::default();
        config.search.base_url = Some("ftp://music.example.com".to_string());
        assert!(config.validate().is_err());

        config.search.base_url = Some("https://music.example.com".to_string());
        assert!(config.validate().is_ok());
    }
}
