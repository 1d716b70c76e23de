use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::histogram::HistogramData;
use super::map::MapData;
use crate::models::{ItemRecord, Location};
use crate::services::session_store::SessionId;

/// Session summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: SessionId,
    pub item_count: usize,
    pub location: Location,
    /// `None` while the collection is empty
    pub max_log_views: Option<f64>,
    /// SHA-256 of the snapshot form
    pub checksum: String,
    pub created_at: DateTime<Utc>,
    pub last_interaction_at: DateTime<Utc>,
}

/// Result of one dashboard interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub session: SessionInfo,
    /// Whether this interaction added articles
    pub grew: bool,
    pub histogram: HistogramData,
    pub map: MapData,
}

/// Persisted collection: flat records in collection order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotData {
    pub items: Vec<ItemRecord>,
    pub checksum: String,
}
