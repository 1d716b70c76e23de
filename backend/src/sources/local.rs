//! In-memory local source implementation.
//!
//! Serves geo search, view counts and previews from a fixed set of pages held
//! in memory. Used for offline development (loaded from a JSON fixture file)
//! and for tests, which can inspect every popularity request and switch the
//! collaborators into a failing state.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::error::{ErrorContext, FetchError, FetchResult};
use super::geo::{GeoHit, GeoQuery, GeoSource};
use super::popularity::PopularitySource;
use super::preview::{canonical_url, shorten, ArticlePreview, ArticlePreviewSource, ABSTRACT_WIDTH};
use crate::models::{Location, PageId};

const DEFAULT_API_URL: &str = "http://localhost/w/api.php";

/// A page served by [`LocalSource`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalPage {
    pub id: PageId,
    pub title: String,
    pub lat: f64,
    pub lon: f64,
    /// Views over the whole trailing window
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl LocalPage {
    pub fn new(id: u64, title: impl Into<String>, lat: f64, lon: f64, views: u64) -> Self {
        Self {
            id: PageId::new(id),
            title: title.into(),
            lat,
            lon,
            views,
            text: String::new(),
            image_url: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}

/// On-disk fixture layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalFixture {
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub pages: Vec<LocalPage>,
}

struct LocalData {
    pages: Vec<LocalPage>,
    api_url: String,

    // Request log
    geo_requests: Vec<GeoQuery>,
    popularity_requests: Vec<Vec<PageId>>,

    // Failure injection
    geo_healthy: bool,
    popularity_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            pages: Vec::new(),
            api_url: DEFAULT_API_URL.to_string(),
            geo_requests: Vec::new(),
            popularity_requests: Vec::new(),
            geo_healthy: true,
            popularity_healthy: true,
        }
    }
}

/// In-memory source.
///
/// Cloning shares the underlying data, so a test can keep a handle while the
/// pipeline owns another.
///
/// # Example
/// ```
/// use wikimap::sources::local::{LocalPage, LocalSource};
///
/// let source = LocalSource::new();
/// source.add_page(LocalPage::new(1, "Brandenburger Tor", 52.5163, 13.3777, 4096));
/// assert_eq!(source.page_count(), 1);
/// ```
#[derive(Clone, Default)]
pub struct LocalSource {
    data: Arc<RwLock<LocalData>>,
}

impl LocalSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pages(pages: impl IntoIterator<Item = LocalPage>) -> Self {
        let source = Self::new();
        for page in pages {
            source.add_page(page);
        }
        source
    }

    /// Load pages from a JSON fixture file (see [`LocalFixture`]).
    pub fn from_fixture_file<P: AsRef<Path>>(path: P) -> FetchResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| FetchError::Configuration {
            message: format!("Failed to read fixture file: {}", e),
            context: ErrorContext::new("load_fixture").with_details(path.display().to_string()),
        })?;
        let fixture: LocalFixture = serde_json::from_str(&content)?;

        let source = Self::with_pages(fixture.pages);
        if let Some(url) = fixture.api_url {
            source.set_api_url(url);
        }
        log::info!(
            "Loaded {} fixture pages from {}",
            source.page_count(),
            path.display()
        );
        Ok(source)
    }

    /// Insert or replace a page.
    pub fn add_page(&self, page: LocalPage) {
        let mut data = self.data.write();
        match data.pages.iter_mut().find(|p| p.id == page.id) {
            Some(existing) => *existing = page,
            None => data.pages.push(page),
        }
    }

    pub fn page_count(&self) -> usize {
        self.data.read().pages.len()
    }

    pub fn set_api_url(&self, url: impl Into<String>) {
        self.data.write().api_url = url.into();
    }

    pub fn set_geo_healthy(&self, healthy: bool) {
        self.data.write().geo_healthy = healthy;
    }

    pub fn set_popularity_healthy(&self, healthy: bool) {
        self.data.write().popularity_healthy = healthy;
    }

    /// Every popularity batch requested so far, in order.
    pub fn popularity_requests(&self) -> Vec<Vec<PageId>> {
        self.data.read().popularity_requests.clone()
    }

    /// All ids ever sent to the popularity collaborator.
    pub fn popularity_requested_ids(&self) -> Vec<PageId> {
        self.data
            .read()
            .popularity_requests
            .iter()
            .flatten()
            .copied()
            .collect()
    }

    pub fn geo_requests(&self) -> Vec<GeoQuery> {
        self.data.read().geo_requests.clone()
    }

    pub fn clear_requests(&self) {
        let mut data = self.data.write();
        data.geo_requests.clear();
        data.popularity_requests.clear();
    }
}

#[async_trait]
impl GeoSource for LocalSource {
    async fn search(&self, query: &GeoQuery) -> FetchResult<Vec<GeoHit>> {
        let mut data = self.data.write();
        data.geo_requests.push(*query);
        if !data.geo_healthy {
            return Err(FetchError::connection("local geo source marked unhealthy")
                .with_operation("geosearch"));
        }

        let radius = f64::from(query.radius_m);
        let mut hits: Vec<(f64, &LocalPage)> = data
            .pages
            .iter()
            .map(|p| (query.center.distance_m(&Location::new(p.lat, p.lon)), p))
            .filter(|(d, _)| *d <= radius)
            .collect();
        hits.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.id.cmp(&b.1.id)));

        Ok(hits
            .into_iter()
            .take(query.limit as usize)
            .map(|(_, p)| GeoHit {
                id: p.id,
                title: p.title.clone(),
                lat: p.lat,
                lon: p.lon,
            })
            .collect())
    }
}

#[async_trait]
impl PopularitySource for LocalSource {
    async fn views(&self, ids: &[PageId], _window_days: u32) -> FetchResult<HashMap<PageId, u64>> {
        let mut data = self.data.write();
        data.popularity_requests.push(ids.to_vec());
        if !data.popularity_healthy {
            return Err(FetchError::connection("local popularity source marked unhealthy")
                .with_operation("pageviews"));
        }

        // Unknown pages report zero views, as missing pages do upstream.
        Ok(ids
            .iter()
            .map(|id| {
                let views = data
                    .pages
                    .iter()
                    .find(|p| p.id == *id)
                    .map_or(0, |p| p.views);
                (*id, views)
            })
            .collect())
    }
}

#[async_trait]
impl ArticlePreviewSource for LocalSource {
    async fn preview(&self, id: PageId) -> FetchResult<ArticlePreview> {
        let data = self.data.read();
        let page = data.pages.iter().find(|p| p.id == id).ok_or_else(|| {
            FetchError::NotFound {
                message: "no such page".to_string(),
                context: ErrorContext::new("preview").with_entity("page").with_entity_id(id),
            }
        })?;

        Ok(ArticlePreview {
            page_id: page.id,
            title: page.title.clone(),
            text: shorten(&page.text, ABSTRACT_WIDTH),
            image_url: page.image_url.clone(),
            canonical_url: canonical_url(&data.api_url, &page.title),
        })
    }
}
