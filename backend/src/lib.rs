//! # Wikimap Backend
//!
//! Interactive map dashboard over geotagged encyclopedia articles.
//!
//! As the user pans the map, the backend grows a per-session collection of
//! nearby articles, annotates each new article with its recent view count
//! and serves a log-scaled popularity histogram plus the map points inside a
//! slider-selected popularity range. The backend exposes a REST API via Axum.
//!
//! ## Features
//!
//! - **Incremental acquisition**: only articles not yet known are fetched,
//!   popularity is requested once per article in batches of at most 50
//! - **Histogram**: equal-width bins over `log2(views)`, zero-view articles
//!   excluded, bars dimmed unless fully inside the selected range
//! - **Filtering**: closed-interval filter on `log_views` for the map
//! - **Snapshots**: collections round-trip through flat JSON records
//! - **HTTP API**: session-scoped endpoints for the frontend
//!
//! ## Architecture
//!
//! - [`models`]: articles, collections, locations and ranges
//! - [`sources`]: geo search, popularity and preview collaborators
//! - [`services`]: the dashboard pipeline and session store
//! - [`routes`]: route DTOs, re-exported through [`api`]
//! - [`i18n`]: display-string translation
//! - [`config`]: TOML + environment configuration
//! - `http`: Axum server (feature `http-server`)

// FetchError carries a structured context for debugging
#![allow(clippy::result_large_err)]

pub mod api;
pub mod config;
pub mod i18n;
pub mod models;
pub mod routes;
pub mod services;
pub mod sources;

#[cfg(feature = "http-server")]
pub mod http;
