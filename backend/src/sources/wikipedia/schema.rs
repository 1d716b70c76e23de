//! Typed MediaWiki response schemas (`formatversion=2`).
//!
//! Every payload is decoded into these structs; anything that does not fit
//! becomes a [`FetchError::Schema`] instead of being traversed loosely.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::models::PageId;
use crate::sources::error::{ErrorContext, FetchError, FetchResult};
use crate::sources::geo::GeoHit;

/// Envelope shared by all `action=query` responses.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "Q: Deserialize<'de>"))]
pub struct ApiResponse<Q> {
    #[serde(default)]
    pub query: Option<Q>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub code: String,
    #[serde(default)]
    pub info: String,
}

impl<Q> ApiResponse<Q> {
    /// Unwrap the `query` member, mapping `error` payloads to [`FetchError::Api`].
    pub fn into_query(self, operation: &str) -> FetchResult<Q> {
        if let Some(err) = self.error {
            return Err(FetchError::Api {
                code: err.code,
                message: err.info,
                context: ErrorContext::new(operation),
            });
        }
        self.query.ok_or_else(|| FetchError::Schema {
            message: "response has no `query` member".to_string(),
            context: ErrorContext::new(operation),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct GeoSearchQuery {
    pub geosearch: Vec<GeoSearchHit>,
}

#[derive(Debug, Deserialize)]
pub struct GeoSearchHit {
    pub pageid: u64,
    pub title: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
pub struct PagesQuery<P> {
    #[serde(default = "Vec::new")]
    pub pages: Vec<P>,
}

#[derive(Debug, Deserialize)]
pub struct PageViewsPage {
    pub pageid: u64,
    #[serde(default)]
    pub missing: bool,
    /// Day → views; days without data are `null`
    #[serde(default)]
    pub pageviews: Option<BTreeMap<String, Option<u64>>>,
}

impl PageViewsPage {
    pub fn total_views(&self) -> u64 {
        self.pageviews
            .as_ref()
            .map(|days| days.values().flatten().sum())
            .unwrap_or(0)
    }
}

#[derive(Debug, Deserialize)]
pub struct PreviewPage {
    #[serde(default)]
    pub pageid: Option<u64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub missing: bool,
    #[serde(default)]
    pub pageimage: Option<String>,
    #[serde(default)]
    pub cirrusdoc: Vec<CirrusDoc>,
}

#[derive(Debug, Deserialize)]
pub struct CirrusDoc {
    pub source: CirrusSource,
}

#[derive(Debug, Deserialize)]
pub struct CirrusSource {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ImageInfoPage {
    #[serde(default)]
    pub imageinfo: Vec<ImageInfo>,
}

#[derive(Debug, Deserialize)]
pub struct ImageInfo {
    pub url: String,
}

fn decode<Q: serde::de::DeserializeOwned>(body: &str, operation: &str) -> FetchResult<Q> {
    let response: ApiResponse<Q> =
        serde_json::from_str(body).map_err(|e| FetchError::from(e).with_operation(operation))?;
    response.into_query(operation)
}

/// Decode a `list=geosearch` response, dropping repeated page ids.
pub fn parse_geosearch(body: &str) -> FetchResult<Vec<GeoHit>> {
    let query: GeoSearchQuery = decode(body, "geosearch")?;

    let mut seen = std::collections::HashSet::new();
    Ok(query
        .geosearch
        .into_iter()
        .filter(|hit| seen.insert(hit.pageid))
        .map(|hit| GeoHit {
            id: PageId::new(hit.pageid),
            title: hit.title,
            lat: hit.lat,
            lon: hit.lon,
        })
        .collect())
}

/// Decode a `prop=pageviews` response into summed views per page.
///
/// Missing pages and pages without view data count as zero.
pub fn parse_pageviews(body: &str) -> FetchResult<HashMap<PageId, u64>> {
    let query: PagesQuery<PageViewsPage> = decode(body, "pageviews")?;
    Ok(query
        .pages
        .iter()
        .map(|page| {
            if page.missing {
                log::debug!("Page {} reported missing, counting zero views", page.pageid);
            }
            (PageId::new(page.pageid), page.total_views())
        })
        .collect())
}

/// Decoded preview page: title, full text and optional image file name.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewParts {
    pub title: String,
    pub text: String,
    pub image_file: Option<String>,
}

/// Decode a `prop=pageimages|cirrusdoc` response for one page.
pub fn parse_preview(body: &str, id: PageId) -> FetchResult<PreviewParts> {
    let query: PagesQuery<PreviewPage> = decode(body, "preview")?;
    let page = query.pages.into_iter().next().ok_or_else(|| FetchError::Schema {
        message: "preview response has no pages".to_string(),
        context: ErrorContext::new("preview").with_entity_id(id),
    })?;

    if page.missing {
        return Err(FetchError::NotFound {
            message: "page does not exist".to_string(),
            context: ErrorContext::new("preview").with_entity("page").with_entity_id(id),
        });
    }

    let doc = page.cirrusdoc.into_iter().next().ok_or_else(|| FetchError::Schema {
        message: "page has no cirrusdoc".to_string(),
        context: ErrorContext::new("preview").with_entity_id(id),
    })?;

    Ok(PreviewParts {
        title: page.title,
        text: doc.source.text,
        image_file: page.pageimage,
    })
}

/// Decode a `prop=imageinfo&iiprop=url` response.
pub fn parse_image_url(body: &str) -> FetchResult<String> {
    let query: PagesQuery<ImageInfoPage> = decode(body, "imageinfo")?;
    query
        .pages
        .into_iter()
        .flat_map(|p| p.imageinfo)
        .map(|info| info.url)
        .next()
        .ok_or_else(|| FetchError::schema("image has no url").with_operation("imageinfo"))
}
