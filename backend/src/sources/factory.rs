//! Source factory for dependency injection.
//!
//! Builds the collaborator set named by the configuration.

use std::str::FromStr;
use std::sync::Arc;

use super::error::{FetchError, FetchResult};
use super::local::LocalSource;
#[cfg(feature = "wikipedia-source")]
use super::wikipedia::WikipediaSource;
use super::FullSource;
use crate::config::WikimapConfig;

/// Source type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    /// Live MediaWiki API
    Wikipedia,
    /// In-memory fixture data
    Local,
}

impl FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "wikipedia" | "wiki" | "mediawiki" => Ok(Self::Wikipedia),
            "local" | "fixture" => Ok(Self::Local),
            _ => Err(format!("Unknown source type: {}", s)),
        }
    }
}

impl SourceType {
    /// Read `WIKIMAP_SOURCE`, defaulting to the live API.
    pub fn from_env() -> Self {
        std::env::var("WIKIMAP_SOURCE")
            .ok()
            .and_then(|val| val.parse().ok())
            .unwrap_or(Self::Wikipedia)
    }
}

/// Creates source instances.
///
/// # Example
/// ```
/// use wikimap::config::WikimapConfig;
/// use wikimap::sources::{FullSource, SourceFactory};
///
/// let mut config = WikimapConfig::default();
/// config.source.source_type = "local".to_string();
/// let source = SourceFactory::create(&config).unwrap();
/// assert_eq!(source.kind(), "local");
/// ```
pub struct SourceFactory;

impl SourceFactory {
    /// Create the source named by `config.source`.
    pub fn create(config: &WikimapConfig) -> FetchResult<Arc<dyn FullSource>> {
        let source_type = config
            .source_type()
            .map_err(|e| FetchError::configuration(e.to_string()))?;

        match source_type {
            SourceType::Wikipedia => {
                #[cfg(feature = "wikipedia-source")]
                {
                    let source = WikipediaSource::new(&config.wiki)?;
                    log::info!("Using MediaWiki source at {}", source.api_url());
                    Ok(Arc::new(source))
                }
                #[cfg(not(feature = "wikipedia-source"))]
                {
                    Err(FetchError::configuration(
                        "Wikipedia source feature not enabled",
                    ))
                }
            }
            SourceType::Local => {
                let source = match &config.source.fixture_path {
                    Some(path) => LocalSource::from_fixture_file(path)?,
                    None => {
                        log::warn!("Local source without fixture file, serving no pages");
                        LocalSource::new()
                    }
                };
                if config.wiki.api_url.is_some() {
                    source.set_api_url(config.wiki.resolved_api_url());
                }
                Ok(Arc::new(source))
            }
        }
    }

    /// Create an empty in-memory source.
    pub fn create_local() -> Arc<dyn FullSource> {
        Arc::new(LocalSource::new())
    }
}
