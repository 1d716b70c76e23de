//! External collaborators: geo search, popularity and article previews.
//!
//! The pipeline only sees the traits defined here. Two implementations ship
//! with the crate:
//!
//! - [`local::LocalSource`]: in-memory fixture data for development and tests
//! - `wikipedia::WikipediaSource`: the live MediaWiki API (feature
//!   `wikipedia-source`)
//!
//! # Module Organization
//!
//! - [`error`]: [`FetchError`] and its structured context
//! - [`geo`]: radius search for geotagged articles
//! - [`popularity`]: per-page view counts and request batching
//! - [`preview`]: article excerpts for the info panel
//! - [`factory`]: builds the configured source

pub mod error;
pub mod factory;
pub mod geo;
pub mod local;
pub mod popularity;
pub mod preview;

#[cfg(feature = "wikipedia-source")]
pub mod wikipedia;

pub use error::{ErrorContext, FetchError, FetchResult};
pub use factory::{SourceFactory, SourceType};
pub use geo::{GeoHit, GeoQuery, GeoSource};
pub use local::LocalSource;
pub use popularity::{fetch_views, PopularitySource, DEFAULT_WINDOW_DAYS, MAX_BATCH_SIZE};
pub use preview::{ArticlePreview, ArticlePreviewSource};

#[cfg(feature = "wikipedia-source")]
pub use wikipedia::WikipediaSource;

/// Composite bound for a source implementing every collaborator.
///
/// The pipeline holds sources as `Arc<dyn FullSource>`.
pub trait FullSource: GeoSource + PopularitySource + ArticlePreviewSource {
    /// Short name for health reporting and logs.
    fn kind(&self) -> &'static str {
        "custom"
    }
}

impl FullSource for LocalSource {
    fn kind(&self) -> &'static str {
        "local"
    }
}

#[cfg(feature = "wikipedia-source")]
impl FullSource for WikipediaSource {
    fn kind(&self) -> &'static str {
        "wikipedia"
    }
}
