//! Wikimap HTTP Server Binary
//!
//! This is the main entry point for the wikimap REST API server.
//! It loads the configuration, builds the source and translator, sets up the
//! HTTP router and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Live German Wikipedia (default)
//! cargo run --bin wikimap-server
//!
//! # Offline, from a fixture file
//! WIKIMAP_SOURCE=local WIKIMAP_FIXTURE=backend/fixtures/berlin.json \
//!   cargo run --bin wikimap-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `WIKIMAP_CONFIG`: Path to `wikimap.toml`
//! - `WIKIMAP_LANGUAGE`, `WIKIMAP_API_URL`, `WIKIMAP_SOURCE`, `WIKIMAP_FIXTURE`:
//!   see `WikimapConfig::apply_env_overrides`
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use wikimap::config::WikimapConfig;
use wikimap::http::{create_router, AppState};
use wikimap::i18n::{DictionaryTranslator, IdentityTranslator, Translator};
use wikimap::sources::{FullSource, SourceFactory};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting wikimap HTTP server");

    let config = WikimapConfig::load()?;
    let source = SourceFactory::create(&config)?;
    info!("Source initialized: {}", source.kind());

    let translator: Arc<dyn Translator> = match &config.i18n.dictionary_path {
        Some(path) => {
            let dictionary = DictionaryTranslator::from_file(path).map_err(|e| anyhow::anyhow!(e))?;
            info!("Loaded {} translations from {}", dictionary.len(), path.display());
            Arc::new(dictionary)
        }
        None => Arc::new(IdentityTranslator),
    };

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    // Create application state and router
    let state = AppState::new(source, translator, config);
    let _sweeper = state.sessions.spawn_eviction(&state.config.session);
    info!(
        "Idle sessions expire after {}s",
        state.config.session.idle_ttl_secs
    );
    let app = create_router(state);

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
