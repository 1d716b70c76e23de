//! HTTP server module for the wikimap backend.
//!
//! This module provides an axum-based HTTP server that exposes the dashboard
//! pipeline as a REST API. Handlers stay thin: they parse requests, pick the
//! session, call the service layer and localize display strings.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Request parsing and validation                         │
//! │  - Per-request language, JSON serialization               │
//! │  - CORS, compression, error handling                      │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (services/)                                │
//! │  - Sessions, collection growth                            │
//! │  - Histogram and map filtering                            │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Source Layer (sources/)                                  │
//! │  - Geo search, popularity, previews                       │
//! │  - WikipediaSource / LocalSource                          │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
