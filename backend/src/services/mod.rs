//! Service layer: the dashboard pipeline and session state.
//!
//! Services sit between the HTTP handlers and the source collaborators. They
//! own the growth, binning and filtering logic and build the route DTOs.
//!
//! # Module Organization
//!
//! - [`collection_store`]: incremental collection growth
//! - [`histogram`]: log-popularity binning and bin selection
//! - [`view_filter`]: slider scaling and point filtering
//! - [`dashboard`]: one interaction pass over a session
//! - [`session_store`]: per-session collections

pub mod collection_store;
pub mod dashboard;
pub mod error;
pub mod histogram;
pub mod session_store;
pub mod view_filter;

pub use collection_store::{extend, CollectionStore};
pub use dashboard::Dashboard;
pub use error::{PipelineError, PipelineResult};
pub use histogram::HistogramBin;
pub use session_store::{Session, SessionError, SessionHandle, SessionId, SessionStore};
pub use view_filter::{normalized_to_absolute, select};
