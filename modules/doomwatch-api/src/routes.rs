use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::{Duration, Utc};
use tracing::error;

use crate::AppState;

/// POST /api/discover — authenticate, run the full pipeline, return the
/// run report. Safe to retry: the publisher's sourceUrl dedup makes
/// overlapping runs idempotent.
pub async fn trigger_discovery(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    // When no secret is configured the check is skipped (flagged loudly at
    // startup); otherwise the bearer token must match exactly.
    if state.config.auth_configured()
        && !bearer_matches(&headers, &state.config.discovery_secret)
    {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"error": "Unauthorized"})),
        )
            .into_response();
    }

    let since = Utc::now() - Duration::hours(state.config.lookback_hours as i64);

    match state.pipeline.run(since).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => {
            error!(error = %e, "Discovery pipeline failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "Discovery pipeline failed",
                    "details": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}

/// GET /api/discover/status — reports which upstream capabilities have
/// credentials present. Purely a configuration diagnostic; no pipeline
/// stage runs.
pub async fn discovery_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "configured": {
            "search": state.config.search_configured(),
            "classification": state.config.classification_configured(),
            "persistence": state.config.persistence_configured(),
        },
    }))
}

fn bearer_matches(headers: &HeaderMap, secret: &str) -> bool {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return false;
    };
    let Ok(value) = value.to_str() else {
        return false;
    };
    let Some(token) = value.strip_prefix("Bearer ") else {
        return false;
    };
    constant_time_eq(token.as_bytes(), secret.as_bytes())
}

/// Constant-time comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
