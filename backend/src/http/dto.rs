//! Data Transfer Objects for the HTTP API.
//!
//! Response bodies are re-exported from the routes module; this file holds
//! request bodies and query parameters.

use serde::{Deserialize, Serialize};

use super::error::AppError;
use crate::i18n::Language;

// Re-export existing DTOs that are already serializable
pub use crate::api::{
    // Histogram
    HistogramBin, HistogramData,
    // Map
    ColorStop, MapData, MapPoint,
    // Preview
    PreviewData,
    // Sessions
    DashboardResponse, SessionInfo, SnapshotData,
    // Models
    ItemRecord, Location, NormalizedRange,
};

/// Request body for creating a session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    /// Start location (default: configured initial location)
    #[serde(default)]
    pub location: Option<Location>,
    /// Collection to restore
    #[serde(default)]
    pub snapshot: Option<Vec<ItemRecord>>,
}

/// Slider bounds in `[0, 1]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RangeBody {
    pub low: f64,
    pub high: f64,
}

/// Request body for one dashboard interaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InteractionRequest {
    /// New map center (default: stay put)
    #[serde(default)]
    pub location: Option<Location>,
    /// Slider position (default: full range)
    #[serde(default)]
    pub range: Option<RangeBody>,
}

/// Request body for restoring a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotRequest {
    pub items: Vec<ItemRecord>,
}

/// Query parameters for histogram and map endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RangeQuery {
    /// Lower slider bound (default: 0)
    #[serde(default)]
    pub low: Option<f64>,
    /// Upper slider bound (default: 1)
    #[serde(default)]
    pub high: Option<f64>,
    /// Number of histogram bins (default: configured)
    #[serde(default)]
    pub bins: Option<usize>,
    #[serde(default)]
    pub lang: Option<String>,
}

/// Query parameters carrying only a language.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LangQuery {
    #[serde(default)]
    pub lang: Option<String>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Kind of the configured source
    pub source: String,
    pub sessions: usize,
}

/// Build a slider range, rejecting bad bounds.
pub fn normalized_range(low: Option<f64>, high: Option<f64>) -> Result<NormalizedRange, AppError> {
    NormalizedRange::new(
        low.unwrap_or(NormalizedRange::FULL.low()),
        high.unwrap_or(NormalizedRange::FULL.high()),
    )
    .map_err(AppError::BadRequest)
}

impl RangeQuery {
    pub fn range(&self) -> Result<NormalizedRange, AppError> {
        normalized_range(self.low, self.high)
    }
}

impl InteractionRequest {
    pub fn range(&self) -> Result<NormalizedRange, AppError> {
        match self.range {
            Some(r) => normalized_range(Some(r.low), Some(r.high)),
            None => Ok(NormalizedRange::FULL),
        }
    }
}

/// Request language, falling back to `default`.
pub fn resolve_language(lang: Option<&str>, default: Language) -> Result<Language, AppError> {
    match lang {
        Some(code) => code.parse().map_err(AppError::BadRequest),
        None => Ok(default),
    }
}
