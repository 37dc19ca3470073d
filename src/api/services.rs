use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde_json::Value;
use tracing::info;

use super::{
    models::{HealthResponse, RecentParams, SectionsRequest, SectionsResponse, SectionsSaved},
    state::AppState,
    utils::{parse_content_type, read_limited},
};
use crate::api::error::ApiError;
use crate::dispatch::DispatchError;
use crate::observability::announce_sections;

/// Current section mapping (GET /api/sections)
pub async fn get_sections(State(state): State<AppState>) -> Json<SectionsResponse> {
    let snapshot = state.registry.snapshot();
    Json(SectionsResponse {
        sections: (*snapshot).clone(),
    })
}

/// Replace the whole section mapping (POST /api/sections)
///
/// ## Flow:
/// 1. Require a JSON content type and a body within `server.max_payload_bytes`
/// 2. Parse `{"sections": {...}}`
/// 3. Validate, persist and swap via the registry; nothing changes on failure
/// 4. Re-announce the active feeds
pub async fn save_sections(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Body,
) -> Result<Json<SectionsSaved>, ApiError> {
    let content_type = headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::InvalidPayload("missing Content-Type header".into()))?;
    parse_content_type(content_type)?;

    let body = read_limited(body, state.config.server.max_payload_bytes).await?;
    let request: SectionsRequest = serde_json::from_slice(&body)?;

    let mapping = state.registry.replace_all(&request.sections).await?;
    state.metrics.sections_updated();

    announce_sections(
        state.config.server.bind_addr,
        &mapping,
        state.config.upstream.default_count,
    );

    Ok(Json(SectionsSaved {
        success: true,
        sections: (*mapping).clone(),
    }))
}

/// Recently added feed for any configured label (GET /api/recent/{label})
///
/// Unknown labels answer 404 without contacting Tautulli. Upstream failures
/// answer 500 with the underlying message and are not retried.
pub async fn recent(
    State(state): State<AppState>,
    Path(label): Path<String>,
    Query(params): Query<RecentParams>,
) -> Result<Json<Value>, ApiError> {
    match state
        .dispatcher
        .recent(&label, params.count.as_deref())
        .await
    {
        Ok(payload) => {
            state.metrics.feed_served();
            info!(%label, "Served recently added feed");
            Ok(Json(payload))
        }
        Err(err) => {
            match &err {
                DispatchError::NotFound(_) => state.metrics.section_not_found(),
                DispatchError::Upstream(_) => state.metrics.upstream_failed(),
            }
            Err(err.into())
        }
    }
}

/// Health check endpoint (GET /health)
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        sections: state.registry.snapshot().len(),
        metrics: state.metrics.snapshot(),
    };

    (StatusCode::OK, Json(response))
}
