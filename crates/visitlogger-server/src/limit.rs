//! Per-IP rate-limiting middleware.
//!
//! Two ceilings, both fixed: a general one on every route and a tighter one
//! on the ingestion/snippet paths, which arbitrary third-party pages hit on
//! every visit. Requests beyond a ceiling are rejected with 429, never
//! queued. Window state lives in [`AppState`].

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{error::AppError, state::AppState};

pub const GENERAL_MAX_PER_MIN: usize = 120;
pub const INGEST_MAX_PER_MIN: usize = 60;

/// Uniform ceiling, applied to the whole router.
pub async fn general(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let ip = extract_client_ip(request.headers());
    if !state
        .check_rate_limit_with_max(&format!("general:{ip}"), GENERAL_MAX_PER_MIN)
        .await
    {
        return AppError::RateLimited.into_response();
    }
    next.run(request).await
}

/// Tighter ceiling for `/track` and `/track.js`, layered on top of the
/// general one (separate window key, so the two budgets are independent).
pub async fn ingest(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let ip = extract_client_ip(request.headers());
    if !state
        .check_rate_limit_with_max(&format!("ingest:{ip}"), INGEST_MAX_PER_MIN)
        .await
    {
        return AppError::RateLimited.into_response();
    }
    next.run(request).await
}

/// Extract the real client IP from `X-Forwarded-For` (first entry).
///
/// Falls back to `"unknown"` when the header is absent — behind the usual
/// reverse proxy the header is always present, and callers without it share
/// one conservative bucket.
pub fn extract_client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
