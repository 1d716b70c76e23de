//! Application configuration.
//!
//! Settings come from a TOML file (`wikimap.toml`) with environment variable
//! overrides on top. Every section is optional; a missing file yields the
//! defaults.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [wiki]
//! language = "de"
//!
//! [query]
//! radius_m = 10000
//! limit = 500
//! batch_size = 50
//! window_days = 30
//!
//! [histogram]
//! bins = 20
//! max_bins = 200
//!
//! [session]
//! idle_ttl_secs = 3600
//! sweep_interval_secs = 60
//!
//! [source]
//! type = "wikipedia"
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::i18n::Language;
use crate::models::Location;
use crate::sources::popularity::MAX_BATCH_SIZE;
use crate::sources::SourceType;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Failed to parse config file: {0}")]
    Parse(String),

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: String, message: String },
}

impl ConfigError {
    fn invalid(key: &str, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WikimapConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub wiki: WikiSettings,
    #[serde(default)]
    pub query: QuerySettings,
    #[serde(default)]
    pub histogram: HistogramSettings,
    #[serde(default)]
    pub map: MapSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub source: SourceSettings,
    #[serde(default)]
    pub i18n: I18nSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Encyclopedia endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WikiSettings {
    /// Default UI language and Wikipedia edition
    #[serde(default)]
    pub language: Language,
    /// Explicit endpoint; derived from `language` when absent
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Collection growth parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySettings {
    #[serde(default = "default_radius_m")]
    pub radius_m: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramSettings {
    #[serde(default = "default_bins")]
    pub bins: usize,
    /// Ceiling for `bins` and for per-request overrides
    #[serde(default = "default_max_bins")]
    pub max_bins: usize,
}

/// Idle session eviction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Sessions without an interaction for this long are dropped
    #[serde(default = "default_idle_ttl_secs")]
    pub idle_ttl_secs: u64,
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

/// Map presentation defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSettings {
    #[serde(default = "default_initial_lat")]
    pub initial_lat: f64,
    #[serde(default = "default_initial_lon")]
    pub initial_lon: f64,
    #[serde(default = "default_zoom")]
    pub zoom: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSettings {
    /// `wikipedia` or `local`
    #[serde(rename = "type", default = "default_source_type")]
    pub source_type: String,
    /// JSON fixture for the local source
    #[serde(default)]
    pub fixture_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct I18nSettings {
    #[serde(default)]
    pub dictionary_path: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_user_agent() -> String {
    format!("wikimap/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_radius_m() -> u32 {
    10_000
}

fn default_limit() -> u32 {
    500
}

fn default_batch_size() -> usize {
    MAX_BATCH_SIZE
}

fn default_window_days() -> u32 {
    30
}

fn default_bins() -> usize {
    20
}

fn default_max_bins() -> usize {
    200
}

fn default_idle_ttl_secs() -> u64 {
    3600
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_initial_lat() -> f64 {
    52.516389
}

fn default_initial_lon() -> f64 {
    13.377778
}

fn default_zoom() -> u8 {
    15
}

fn default_source_type() -> String {
    "wikipedia".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for WikiSettings {
    fn default() -> Self {
        Self {
            language: Language::default(),
            api_url: None,
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl WikiSettings {
    /// Explicit `api_url`, or the endpoint of the configured language.
    pub fn resolved_api_url(&self) -> String {
        self.api_url
            .clone()
            .unwrap_or_else(|| self.language.api_url())
    }
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            radius_m: default_radius_m(),
            limit: default_limit(),
            batch_size: default_batch_size(),
            window_days: default_window_days(),
        }
    }
}

impl Default for HistogramSettings {
    fn default() -> Self {
        Self {
            bins: default_bins(),
            max_bins: default_max_bins(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            idle_ttl_secs: default_idle_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl SessionSettings {
    pub fn idle_ttl(&self) -> chrono::Duration {
        i64::try_from(self.idle_ttl_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }

    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            initial_lat: default_initial_lat(),
            initial_lon: default_initial_lon(),
            zoom: default_zoom(),
        }
    }
}

impl MapSettings {
    pub fn initial_location(&self) -> Location {
        Location::new(self.initial_lat, self.initial_lon)
    }
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            source_type: default_source_type(),
            fixture_path: None,
        }
    }
}

impl WikimapConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: WikimapConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Uses `WIKIMAP_CONFIG` when set, otherwise searches for `wikimap.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    ///
    /// Falls back to defaults when no file is found.
    pub fn from_default_location() -> Result<Self, ConfigError> {
        if let Ok(path) = env::var("WIKIMAP_CONFIG") {
            return Self::from_file(path);
        }

        let search_paths = [
            PathBuf::from("wikimap.toml"),
            PathBuf::from("backend/wikimap.toml"),
            PathBuf::from("../wikimap.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                log::info!("Using configuration file {}", path.display());
                return Self::from_file(&path);
            }
        }

        log::info!("No wikimap.toml found, using defaults");
        Ok(Self::default())
    }

    /// Default location plus environment overrides, validated.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_default_location()?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// # Environment Variables
    /// - `HOST`, `PORT`: bind address
    /// - `WIKIMAP_LANGUAGE`: default language (`de`, `en`)
    /// - `WIKIMAP_API_URL`: explicit MediaWiki endpoint
    /// - `WIKIMAP_SOURCE`: `wikipedia` or `local`
    /// - `WIKIMAP_FIXTURE`: fixture file for the local source
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(host) = env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::invalid("PORT", "must be a valid port number"))?;
        }
        if let Ok(lang) = env::var("WIKIMAP_LANGUAGE") {
            self.wiki.language = lang
                .parse()
                .map_err(|e: String| ConfigError::invalid("WIKIMAP_LANGUAGE", e))?;
        }
        if let Ok(url) = env::var("WIKIMAP_API_URL") {
            self.wiki.api_url = Some(url);
        }
        if let Ok(source) = env::var("WIKIMAP_SOURCE") {
            self.source.source_type = source;
        }
        if let Ok(path) = env::var("WIKIMAP_FIXTURE") {
            self.source.fixture_path = Some(PathBuf::from(path));
        }
        Ok(())
    }

    pub fn source_type(&self) -> Result<SourceType, ConfigError> {
        self.source
            .source_type
            .parse()
            .map_err(|e: String| ConfigError::invalid("source.type", e))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.query.radius_m == 0 {
            return Err(ConfigError::invalid("query.radius_m", "must be positive"));
        }
        if self.query.limit == 0 {
            return Err(ConfigError::invalid("query.limit", "must be positive"));
        }
        if self.query.batch_size == 0 || self.query.batch_size > MAX_BATCH_SIZE {
            return Err(ConfigError::invalid(
                "query.batch_size",
                format!("must be in 1..={}", MAX_BATCH_SIZE),
            ));
        }
        if self.query.window_days == 0 {
            return Err(ConfigError::invalid("query.window_days", "must be positive"));
        }
        if self.histogram.max_bins == 0 {
            return Err(ConfigError::invalid("histogram.max_bins", "must be positive"));
        }
        if self.histogram.bins == 0 || self.histogram.bins > self.histogram.max_bins {
            return Err(ConfigError::invalid(
                "histogram.bins",
                format!("must be in 1..={}", self.histogram.max_bins),
            ));
        }
        if self.session.idle_ttl_secs == 0 {
            return Err(ConfigError::invalid("session.idle_ttl_secs", "must be positive"));
        }
        if self.session.sweep_interval_secs == 0 {
            return Err(ConfigError::invalid(
                "session.sweep_interval_secs",
                "must be positive",
            ));
        }
        self.map
            .initial_location()
            .validate()
            .map_err(|e| ConfigError::invalid("map.initial_lat/initial_lon", e))?;
        self.source_type()?;
        Ok(())
    }
}
