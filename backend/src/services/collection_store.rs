//! Incremental growth of a session's collection.
//!
//! Each call asks the geo collaborator for articles around a location, keeps
//! only the ids the collection has not seen, fetches popularity for exactly
//! those and merges them in. Nothing already known is ever re-fetched.

use std::collections::HashSet;
use std::sync::Arc;

use super::error::{PipelineError, PipelineResult};
use crate::config::QuerySettings;
use crate::models::{Collection, Item, Location, PageId};
use crate::sources::{fetch_views, FullSource, GeoHit, GeoQuery, GeoSource, PopularitySource};

/// Grow `collection` with the articles found around `location`.
///
/// Returns the input handle itself (`Arc::ptr_eq` holds) when the search
/// turns up nothing new. On any collaborator failure the error is returned
/// and `collection` is untouched.
pub async fn extend<S>(
    source: &S,
    collection: &Arc<Collection>,
    location: Location,
    query: &QuerySettings,
) -> PipelineResult<Arc<Collection>>
where
    S: GeoSource + PopularitySource + ?Sized,
{
    location.validate().map_err(PipelineError::InvalidLocation)?;

    let hits = source
        .search(&GeoQuery::new(location, query.radius_m, query.limit))
        .await?;

    let mut seen = HashSet::new();
    let new_hits: Vec<GeoHit> = hits
        .into_iter()
        .filter(|hit| !collection.contains(hit.id) && seen.insert(hit.id))
        .collect();

    if new_hits.is_empty() {
        log::debug!("No new articles around {}", location);
        return Ok(Arc::clone(collection));
    }

    let ids: Vec<PageId> = new_hits.iter().map(|hit| hit.id).collect();
    let views = fetch_views(source, &ids, query.batch_size, query.window_days).await?;

    let new_items = new_hits.into_iter().map(|hit| {
        let count = views.get(&hit.id).copied().unwrap_or_default();
        Item::new(hit.id, hit.title, hit.lat, hit.lon, count)
    });
    let grown = collection.merged(new_items);

    log::info!(
        "Collection grew by {} articles around {} ({} total)",
        grown.len() - collection.len(),
        location,
        grown.len()
    );
    Ok(Arc::new(grown))
}

/// Source plus growth parameters, bound once per process.
#[derive(Clone)]
pub struct CollectionStore {
    source: Arc<dyn FullSource>,
    query: QuerySettings,
}

impl CollectionStore {
    pub fn new(source: Arc<dyn FullSource>, query: QuerySettings) -> Self {
        Self { source, query }
    }

    pub fn source(&self) -> &Arc<dyn FullSource> {
        &self.source
    }

    pub fn query(&self) -> &QuerySettings {
        &self.query
    }

    pub async fn extend(
        &self,
        collection: &Arc<Collection>,
        location: Location,
    ) -> PipelineResult<Arc<Collection>> {
        extend(self.source.as_ref(), collection, location, &self.query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::local::{LocalPage, LocalSource};
    use crate::sources::FetchError;

    fn center() -> Location {
        Location::new(52.516389, 13.377778)
    }

    fn source() -> LocalSource {
        LocalSource::with_pages(vec![
            LocalPage::new(1, "Brandenburger Tor", 52.516275, 13.377704, 256),
            LocalPage::new(2, "Pariser Platz", 52.516300, 13.379100, 0),
            LocalPage::new(3, "Reichstagsgebäude", 52.518620, 13.376187, 64),
        ])
    }

    #[tokio::test]
    async fn test_initial_extend_fetches_everything() {
        let source = source();
        let empty = Arc::new(Collection::new());
        let grown = extend(&source, &empty, center(), &QuerySettings::default())
            .await
            .unwrap();

        assert_eq!(grown.len(), 3);
        assert_eq!(grown.get(PageId::new(1)).unwrap().log_views(), 8.0);
        assert_eq!(grown.get(PageId::new(2)).unwrap().log_views(), 0.0);
        assert_eq!(source.popularity_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_repeat_extend_returns_same_handle() {
        let source = source();
        let settings = QuerySettings::default();
        let first = extend(&source, &Arc::new(Collection::new()), center(), &settings)
            .await
            .unwrap();
        source.clear_requests();

        let second = extend(&source, &first, center(), &settings).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(source.popularity_requests().is_empty());
    }

    #[tokio::test]
    async fn test_geo_failure_leaves_collection_untouched() {
        let source = source();
        source.set_geo_healthy(false);
        let empty = Arc::new(Collection::new());

        let err = extend(&source, &empty, center(), &QuerySettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Fetch(FetchError::Connection { .. })));
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_location() {
        let source = source();
        let err = extend(
            &source,
            &Arc::new(Collection::new()),
            Location::new(120.0, 0.0),
            &QuerySettings::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidLocation(_)));
        assert!(source.geo_requests().is_empty());
    }

    #[tokio::test]
    async fn test_store_uses_configured_query() {
        let local = source();
        let settings = QuerySettings {
            radius_m: 100,
            limit: 1,
            ..QuerySettings::default()
        };
        let store = CollectionStore::new(Arc::new(local.clone()), settings);

        let grown = store
            .extend(&Arc::new(Collection::new()), center())
            .await
            .unwrap();
        assert_eq!(grown.len(), 1);

        let geo = local.geo_requests();
        assert_eq!(geo[0].radius_m, 100);
        assert_eq!(geo[0].limit, 1);
    }
}
