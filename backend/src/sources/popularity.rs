//! Popularity collaborator and request batching.

use std::collections::HashMap;

use async_trait::async_trait;

use super::error::{ErrorContext, FetchError, FetchResult};
use crate::models::PageId;

/// Upstream ceiling on page ids per popularity request.
pub const MAX_BATCH_SIZE: usize = 50;

/// Default trailing window for view counts, in days.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Source of per-page view counts.
#[async_trait]
pub trait PopularitySource: Send + Sync {
    /// Summed views over the trailing `window_days` for ONE batch of ids.
    ///
    /// Callers keep `ids.len()` within [`MAX_BATCH_SIZE`]; use
    /// [`fetch_views`] for arbitrary id lists.
    async fn views(&self, ids: &[PageId], window_days: u32) -> FetchResult<HashMap<PageId, u64>>;
}

/// Fetch view counts for `ids`, one request per chunk of `batch_size`.
///
/// Chunks are requested sequentially and any failing chunk aborts the whole
/// fetch. The result holds exactly one entry per distinct input id; an id
/// the source did not answer for is a schema error.
pub async fn fetch_views<P>(
    source: &P,
    ids: &[PageId],
    batch_size: usize,
    window_days: u32,
) -> FetchResult<HashMap<PageId, u64>>
where
    P: PopularitySource + ?Sized,
{
    if batch_size == 0 || batch_size > MAX_BATCH_SIZE {
        return Err(FetchError::Configuration {
            message: format!("batch size must be in 1..={}, got {}", MAX_BATCH_SIZE, batch_size),
            context: ErrorContext::new("pageviews"),
        });
    }

    let mut out = HashMap::with_capacity(ids.len());
    for (n, chunk) in ids.chunks(batch_size).enumerate() {
        log::debug!("Requesting views for chunk {} ({} ids)", n, chunk.len());

        let answered = source
            .views(chunk, window_days)
            .await
            .map_err(|e| e.with_operation("pageviews"))?;

        for id in chunk {
            let views = answered.get(id).copied().ok_or_else(|| FetchError::Schema {
                message: "page missing from popularity response".to_string(),
                context: ErrorContext::new("pageviews")
                    .with_entity("page")
                    .with_entity_id(id),
            })?;
            out.insert(*id, views);
        }

        let extra = answered.keys().filter(|id| !chunk.contains(id)).count();
        if extra > 0 {
            log::debug!("Ignoring {} unrequested ids in chunk {}", extra, n);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Answers `id * 10` for each id and records batch sizes.
    struct Recording {
        batches: Mutex<Vec<usize>>,
        drop_id: Option<PageId>,
        fail_on_batch: Option<usize>,
    }

    impl Recording {
        fn new() -> Self {
            Self {
                batches: Mutex::new(Vec::new()),
                drop_id: None,
                fail_on_batch: None,
            }
        }
    }

    #[async_trait]
    impl PopularitySource for Recording {
        async fn views(
            &self,
            ids: &[PageId],
            _window_days: u32,
        ) -> FetchResult<HashMap<PageId, u64>> {
            let n = {
                let mut batches = self.batches.lock();
                batches.push(ids.len());
                batches.len() - 1
            };
            if self.fail_on_batch == Some(n) {
                return Err(FetchError::connection("reset by peer"));
            }
            Ok(ids
                .iter()
                .filter(|id| Some(**id) != self.drop_id)
                .map(|id| (*id, id.value() * 10))
                .collect())
        }
    }

    fn ids(n: u64) -> Vec<PageId> {
        (1..=n).map(PageId::new).collect()
    }

    #[tokio::test]
    async fn test_chunks_respect_batch_size() {
        let source = Recording::new();
        let result = fetch_views(&source, &ids(120), 50, 30).await.unwrap();

        assert_eq!(result.len(), 120);
        assert_eq!(*source.batches.lock(), vec![50, 50, 20]);
        assert_eq!(result[&PageId::new(77)], 770);
    }

    #[tokio::test]
    async fn test_exact_multiple_of_batch_size() {
        let source = Recording::new();
        fetch_views(&source, &ids(100), 50, 30).await.unwrap();
        assert_eq!(*source.batches.lock(), vec![50, 50]);
    }

    #[tokio::test]
    async fn test_empty_ids_issue_no_request() {
        let source = Recording::new();
        let result = fetch_views(&source, &[], 50, 30).await.unwrap();
        assert!(result.is_empty());
        assert!(source.batches.lock().is_empty());
    }

    #[tokio::test]
    async fn test_failing_chunk_aborts() {
        let mut source = Recording::new();
        source.fail_on_batch = Some(1);
        let err = fetch_views(&source, &ids(60), 50, 30).await.unwrap_err();

        assert!(matches!(err, FetchError::Connection { .. }));
        assert_eq!(err.context().operation.as_deref(), Some("pageviews"));
    }

    #[tokio::test]
    async fn test_missing_id_is_schema_error() {
        let mut source = Recording::new();
        source.drop_id = Some(PageId::new(3));
        let err = fetch_views(&source, &ids(5), 50, 30).await.unwrap_err();

        assert!(matches!(err, FetchError::Schema { .. }));
        assert_eq!(err.context().entity_id.as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn test_invalid_batch_size() {
        let source = Recording::new();
        assert!(fetch_views(&source, &ids(3), 0, 30).await.is_err());
        assert!(fetch_views(&source, &ids(3), 51, 30).await.is_err());
        assert!(source.batches.lock().is_empty());
    }
}
