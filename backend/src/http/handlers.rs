//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    resolve_language, CreateSessionRequest, DashboardResponse, HealthResponse, HistogramData,
    InteractionRequest, LangQuery, MapData, PreviewData, RangeQuery, SessionInfo, SnapshotData,
    SnapshotRequest,
};
use super::error::AppError;
use super::state::AppState;
use crate::models::{Collection, PageId};
use crate::services::{SessionHandle, SessionId};
use crate::sources::{ArticlePreviewSource, FullSource};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn session_handle(state: &AppState, id: &str) -> Result<SessionHandle, AppError> {
    let id: SessionId = id.parse()?;
    Ok(state.sessions.get(id)?)
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        source: state.source().kind().to_string(),
        sessions: state.sessions.len(),
    }))
}

// =============================================================================
// Sessions
// =============================================================================

/// POST /v1/sessions
///
/// Create a session, optionally restoring a snapshot. Nothing is fetched
/// until the first interaction.
pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionInfo>), AppError> {
    let location = request
        .location
        .unwrap_or_else(|| state.dashboard.initial_location());
    location.validate().map_err(AppError::BadRequest)?;

    let collection = match request.snapshot {
        Some(records) => Collection::from_records(records)?,
        None => Collection::new(),
    };

    let handle = state.sessions.create(location, collection);
    let info = handle.lock().await.info();
    Ok((StatusCode::CREATED, Json(info)))
}

/// GET /v1/sessions/{session_id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> HandlerResult<SessionInfo> {
    let handle = session_handle(&state, &session_id)?;
    let info = handle.lock().await.info();
    Ok(Json(info))
}

/// DELETE /v1/sessions/{session_id}
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id: SessionId = session_id.parse()?;
    state.sessions.remove(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/sessions/{session_id}/interactions
///
/// Pan and/or move the slider: grow the collection around the new location
/// and return histogram and map for the slider range.
pub async fn post_interaction(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(query): Query<LangQuery>,
    Json(request): Json<InteractionRequest>,
) -> HandlerResult<DashboardResponse> {
    let language = resolve_language(query.lang.as_deref(), state.default_language())?;
    let range = request.range()?;
    let handle = session_handle(&state, &session_id)?;

    // Held across the fetch so interactions of one session never interleave.
    let mut session = handle.lock().await;
    let mut response = state
        .dashboard
        .interact(&mut session, request.location, range)
        .await?;

    response.histogram.localize(state.translator.as_ref(), language);
    response.map.localize(state.translator.as_ref(), language);
    Ok(Json(response))
}

// =============================================================================
// Visualization Endpoints
// =============================================================================

/// GET /v1/sessions/{session_id}/histogram
pub async fn get_histogram(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(query): Query<RangeQuery>,
) -> HandlerResult<HistogramData> {
    let language = resolve_language(query.lang.as_deref(), state.default_language())?;
    let range = query.range()?;
    let handle = session_handle(&state, &session_id)?;

    let collection = Arc::clone(&handle.lock().await.collection);
    let mut data = state
        .dashboard
        .histogram_data(&collection, range, query.bins)?;
    data.localize(state.translator.as_ref(), language);
    Ok(Json(data))
}

/// GET /v1/sessions/{session_id}/points
pub async fn get_points(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(query): Query<RangeQuery>,
) -> HandlerResult<MapData> {
    let language = resolve_language(query.lang.as_deref(), state.default_language())?;
    let range = query.range()?;
    let handle = session_handle(&state, &session_id)?;

    let (collection, center) = {
        let session = handle.lock().await;
        (Arc::clone(&session.collection), session.location)
    };
    let mut data = state.dashboard.map_data(&collection, range, center)?;
    data.localize(state.translator.as_ref(), language);
    Ok(Json(data))
}

// =============================================================================
// Snapshots
// =============================================================================

/// GET /v1/sessions/{session_id}/snapshot
pub async fn get_snapshot(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> HandlerResult<SnapshotData> {
    let handle = session_handle(&state, &session_id)?;
    let collection = Arc::clone(&handle.lock().await.collection);

    Ok(Json(SnapshotData {
        items: collection.to_records(),
        checksum: collection.checksum(),
    }))
}

/// PUT /v1/sessions/{session_id}/snapshot
///
/// Replace the session's collection with a stored one.
pub async fn put_snapshot(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<SnapshotRequest>,
) -> HandlerResult<SessionInfo> {
    let collection = Collection::from_records(request.items)?;
    let handle = session_handle(&state, &session_id)?;

    let mut session = handle.lock().await;
    session.collection = Arc::new(collection);
    session.touch();
    Ok(Json(session.info()))
}

// =============================================================================
// Articles
// =============================================================================

/// GET /v1/articles/{page_id}/preview
pub async fn get_article_preview(
    State(state): State<AppState>,
    Path(page_id): Path<u64>,
    Query(query): Query<LangQuery>,
) -> HandlerResult<PreviewData> {
    let language = resolve_language(query.lang.as_deref(), state.default_language())?;
    let preview = state.source().preview(PageId::new(page_id)).await?;

    let mut data = PreviewData::from(preview);
    data.localize(state.translator.as_ref(), language);
    Ok(Json(data))
}
