//! Public API surface of the dashboard.
//!
//! This file consolidates the DTO types for the HTTP API.
//! All types derive Serialize/Deserialize for JSON serialization.

pub use crate::models::{AbsoluteRange, ItemRecord, Location, NormalizedRange, PageId};
pub use crate::routes::histogram::HistogramData;
pub use crate::routes::map::ColorStop;
pub use crate::routes::map::MapData;
pub use crate::routes::map::MapPoint;
pub use crate::routes::preview::PreviewData;
pub use crate::routes::session::DashboardResponse;
pub use crate::routes::session::SessionInfo;
pub use crate::routes::session::SnapshotData;
pub use crate::services::histogram::HistogramBin;
pub use crate::services::session_store::SessionId;
