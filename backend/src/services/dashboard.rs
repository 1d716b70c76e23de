//! Dashboard pipeline: grow, bin, filter.
//!
//! The collection is passed in and returned explicitly; the pipeline itself
//! holds no per-session state. One interaction is one pass of
//! `extend` → `compute_histogram` → `filter_for_display`.

use std::sync::Arc;

use super::collection_store::CollectionStore;
use super::error::{PipelineError, PipelineResult};
use super::histogram::{self, HistogramBin};
use super::session_store::Session;
use super::view_filter;
use crate::api::{DashboardResponse, HistogramData, MapData, MapPoint};
use crate::config::{HistogramSettings, MapSettings, WikimapConfig};
use crate::models::{Collection, Item, Location, NormalizedRange};
use crate::routes::{histogram as histogram_route, map as map_route};
use crate::sources::FullSource;

/// Pipeline bound to one source and the display settings.
#[derive(Clone)]
pub struct Dashboard {
    store: CollectionStore,
    histogram: HistogramSettings,
    map: MapSettings,
}

impl Dashboard {
    pub fn new(store: CollectionStore, histogram: HistogramSettings, map: MapSettings) -> Self {
        Self {
            store,
            histogram,
            map,
        }
    }

    pub fn from_config(source: Arc<dyn FullSource>, config: &WikimapConfig) -> Self {
        Self::new(
            CollectionStore::new(source, config.query.clone()),
            config.histogram.clone(),
            config.map.clone(),
        )
    }

    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    pub fn initial_location(&self) -> Location {
        self.map.initial_location()
    }

    /// Grow `state` around `location`; see [`super::collection_store::extend`].
    pub async fn extend(
        &self,
        state: &Arc<Collection>,
        location: Location,
    ) -> PipelineResult<Arc<Collection>> {
        self.store.extend(state, location).await
    }

    /// Histogram with the configured number of bins.
    pub fn compute_histogram(
        &self,
        state: &Collection,
        range: NormalizedRange,
    ) -> PipelineResult<Vec<HistogramBin>> {
        let absolute = view_filter::normalized_to_absolute(range, state)?;
        histogram::compute(state, self.histogram.bins, absolute)
    }

    /// Items to draw for the slider `range`, in collection order.
    pub fn filter_for_display<'a>(
        &self,
        state: &'a Collection,
        range: NormalizedRange,
    ) -> PipelineResult<Vec<&'a Item>> {
        let absolute = view_filter::normalized_to_absolute(range, state)?;
        Ok(view_filter::select(state, absolute))
    }

    /// Histogram DTO; `bins` overrides the configured count up to `max_bins`.
    pub fn histogram_data(
        &self,
        state: &Collection,
        range: NormalizedRange,
        bins: Option<usize>,
    ) -> PipelineResult<HistogramData> {
        let bins = bins.unwrap_or(self.histogram.bins);
        if bins > self.histogram.max_bins {
            return Err(PipelineError::InvalidRange(format!(
                "at most {} bins allowed, got {}",
                self.histogram.max_bins, bins
            )));
        }
        let absolute = view_filter::normalized_to_absolute(range, state)?;
        let bins = histogram::compute(state, bins, absolute)?;

        Ok(HistogramData {
            binned_count: bins.iter().map(|b| b.count).sum(),
            bins,
            normalized_range: range,
            range: absolute,
            max_log_views: state.max_log_views().unwrap_or_default(),
            total_count: state.len(),
            hover_template: histogram_route::hover_template(
                histogram_route::VIEWS_LABEL,
                histogram_route::PLACES_LABEL,
            ),
        })
    }

    /// Map DTO centered on `center`.
    pub fn map_data(
        &self,
        state: &Collection,
        range: NormalizedRange,
        center: Location,
    ) -> PipelineResult<MapData> {
        let absolute = view_filter::normalized_to_absolute(range, state)?;
        let points: Vec<MapPoint> = view_filter::select(state, absolute)
            .into_iter()
            .map(MapPoint::from)
            .collect();

        Ok(MapData {
            points,
            total_count: state.len(),
            center,
            zoom: self.map.zoom,
            range: absolute,
            color_range: [0.0, state.max_log_views().unwrap_or_default()],
            colorscale: map_route::colorscale(),
            hover_template: map_route::hover_template(map_route::HOVER_LABEL),
        })
    }

    /// One full interaction on `session`.
    ///
    /// Moves the session to `location` (when given), grows its collection and
    /// renders histogram and map for `range`. On failure the session keeps
    /// its previous collection and location. A session that still knows no
    /// articles gets an empty histogram and map.
    pub async fn interact(
        &self,
        session: &mut Session,
        location: Option<Location>,
        range: NormalizedRange,
    ) -> PipelineResult<DashboardResponse> {
        let location = location.unwrap_or(session.location);
        let grown = self.extend(&session.collection, location).await?;
        let grew = !Arc::ptr_eq(&grown, &session.collection);

        session.collection = grown;
        session.location = location;
        session.touch();

        let state = session.collection.as_ref();
        let (histogram, map) = if state.is_empty() {
            (
                HistogramData::empty(range),
                MapData::empty(location, self.map.zoom),
            )
        } else {
            (
                self.histogram_data(state, range, None)?,
                self.map_data(state, range, location)?,
            )
        };

        Ok(DashboardResponse {
            session: session.info(),
            grew,
            histogram,
            map,
        })
    }
}

#[cfg(test)]
#[path = "dashboard_tests.rs"]
mod tests;
