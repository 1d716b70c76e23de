//! Geo search collaborator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::FetchResult;
use crate::models::{Location, PageId};

/// Radius search around a map center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoQuery {
    pub center: Location,
    /// Search radius in metres
    pub radius_m: u32,
    /// Maximum number of hits
    pub limit: u32,
}

impl GeoQuery {
    pub fn new(center: Location, radius_m: u32, limit: u32) -> Self {
        Self {
            center,
            radius_m,
            limit,
        }
    }
}

/// One article found by a geo search, before popularity is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoHit {
    pub id: PageId,
    pub title: String,
    pub lat: f64,
    pub lon: f64,
}

/// Source of geotagged articles.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to be shared across sessions.
#[async_trait]
pub trait GeoSource: Send + Sync {
    /// Articles within `query.radius_m` of `query.center`, at most
    /// `query.limit` of them.
    ///
    /// # Returns
    /// * `Ok(Vec<GeoHit>)` - Hits, deduplicated by id
    /// * `Err(FetchError)` - Upstream unreachable or payload malformed
    async fn search(&self, query: &GeoQuery) -> FetchResult<Vec<GeoHit>>;
}
