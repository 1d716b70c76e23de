//! Live MediaWiki API source.
//!
//! All three collaborators talk to one `api.php` endpoint of a language
//! edition (e.g. `https://de.wikipedia.org/w/api.php`):
//!
//! - `list=geosearch` for articles around a coordinate
//! - `prop=pageviews` for daily view counts, at most 50 page ids per request
//! - `prop=pageimages|cirrusdoc` plus `prop=imageinfo` for previews

pub mod schema;

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use super::error::{ErrorContext, FetchError, FetchResult};
use super::geo::{GeoHit, GeoQuery, GeoSource};
use super::popularity::{PopularitySource, MAX_BATCH_SIZE};
use super::preview::{canonical_url, shorten, ArticlePreview, ArticlePreviewSource, ABSTRACT_WIDTH};
use crate::config::WikiSettings;
use crate::models::PageId;

/// File namespace prefix used by the German edition for image titles.
const FILE_NAMESPACE: &str = "Datei:";

/// MediaWiki API client.
#[derive(Clone)]
pub struct WikipediaSource {
    client: reqwest::Client,
    api_url: String,
}

impl WikipediaSource {
    /// Build a client for the endpoint described by `settings`.
    pub fn new(settings: &WikiSettings) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| FetchError::Configuration {
                message: format!("Failed to build HTTP client: {}", e),
                context: ErrorContext::new("client_init"),
            })?;

        Ok(Self {
            client,
            api_url: settings.resolved_api_url(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Run one `action=query` request and return the raw body.
    async fn query(&self, operation: &str, params: &[(&str, String)]) -> FetchResult<String> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[("action", "query"), ("format", "json"), ("formatversion", "2")])
            .query(params)
            .send()
            .await
            .map_err(|e| FetchError::from(e).with_operation(operation))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from(e).with_operation(operation))?;

        if !status.is_success() {
            let snippet: String = body.trim().chars().take(200).collect();
            return Err(FetchError::status(status.as_u16(), snippet).with_operation(operation));
        }
        Ok(body)
    }

    async fn image_url(&self, file: &str) -> FetchResult<String> {
        let body = self
            .query(
                "imageinfo",
                &[
                    ("prop", "imageinfo".to_string()),
                    ("iiprop", "url".to_string()),
                    ("titles", format!("{}{}", FILE_NAMESPACE, file)),
                ],
            )
            .await?;
        schema::parse_image_url(&body)
    }
}

#[async_trait]
impl GeoSource for WikipediaSource {
    async fn search(&self, query: &GeoQuery) -> FetchResult<Vec<GeoHit>> {
        log::debug!(
            "geosearch around {} radius={}m limit={}",
            query.center,
            query.radius_m,
            query.limit
        );
        let body = self
            .query(
                "geosearch",
                &[
                    ("list", "geosearch".to_string()),
                    ("gscoord", query.center.to_string()),
                    ("gsradius", query.radius_m.to_string()),
                    ("gslimit", query.limit.to_string()),
                ],
            )
            .await?;
        schema::parse_geosearch(&body)
    }
}

#[async_trait]
impl PopularitySource for WikipediaSource {
    async fn views(&self, ids: &[PageId], window_days: u32) -> FetchResult<HashMap<PageId, u64>> {
        if ids.len() > MAX_BATCH_SIZE {
            return Err(FetchError::configuration(format!(
                "{} page ids exceed the per-request limit of {}",
                ids.len(),
                MAX_BATCH_SIZE
            ))
            .with_operation("pageviews"));
        }
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let pageids = ids
            .iter()
            .map(PageId::to_string)
            .collect::<Vec<_>>()
            .join("|");
        let body = self
            .query(
                "pageviews",
                &[
                    ("prop", "pageviews".to_string()),
                    ("pvipdays", window_days.to_string()),
                    ("pageids", pageids),
                ],
            )
            .await?;
        schema::parse_pageviews(&body)
    }
}

#[async_trait]
impl ArticlePreviewSource for WikipediaSource {
    async fn preview(&self, id: PageId) -> FetchResult<ArticlePreview> {
        let body = self
            .query(
                "preview",
                &[
                    ("prop", "pageimages|cirrusdoc".to_string()),
                    ("pageids", id.to_string()),
                    ("cdincludes", "all".to_string()),
                ],
            )
            .await
            .map_err(|e| e.with_entity_id(id))?;
        let parts = schema::parse_preview(&body, id)?;

        // A broken image lookup only costs the picture.
        let image_url = match parts.image_file.as_deref() {
            Some(file) => match self.image_url(file).await {
                Ok(url) => Some(url),
                Err(e) => {
                    log::warn!("Image lookup for page {} failed: {}", id, e);
                    None
                }
            },
            None => None,
        };

        Ok(ArticlePreview {
            page_id: id,
            text: shorten(&parts.text, ABSTRACT_WIDTH),
            image_url,
            canonical_url: canonical_url(&self.api_url, &parts.title),
            title: parts.title,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_resolves_api_url_from_language() {
        let settings = WikiSettings::default();
        let source = WikipediaSource::new(&settings).unwrap();
        assert_eq!(source.api_url(), "https://de.wikipedia.org/w/api.php");
    }

    #[tokio::test]
    async fn test_views_rejects_oversized_batch() {
        let source = WikipediaSource::new(&WikiSettings::default()).unwrap();
        let ids: Vec<PageId> = (0..51).map(PageId::new).collect();
        let err = source.views(&ids, 30).await.unwrap_err();
        assert!(matches!(err, FetchError::Configuration { .. }));
    }

    #[tokio::test]
    async fn test_views_empty_batch_is_free() {
        let source = WikipediaSource::new(&WikiSettings::default()).unwrap();
        assert!(source.views(&[], 30).await.unwrap().is_empty());
    }
}
