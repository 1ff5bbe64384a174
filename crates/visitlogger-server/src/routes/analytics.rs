use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use visitlogger_core::aggregate::{
    daily_visit_counts, graph_window_start, resolve_graph_days, PageWindow,
};

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// `GET /analytics/{script_id}` — paginated reverse-chronological listing.
///
/// `page` floors at 1 (default 1), `limit` defaults to 10, and the store is
/// asked for `offset = (page - 1) * limit`. The response carries the total
/// matching count so the dashboard can compute page counts, and echoes the
/// resolved `page`/`limit`. Zero matches is an empty 200, not a 404.
#[tracing::instrument(skip(state))]
pub async fn list_analytics(
    State(state): State<Arc<AppState>>,
    Path(script_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let window = PageWindow::resolve(query.page, query.limit);
    let page = state
        .store
        .list_visits(&script_id, window.offset, window.limit)
        .await?;

    Ok(Json(json!({
        "documents": page.documents,
        "total": page.total,
        "page": window.page,
        "limit": window.limit,
    })))
}

#[derive(Debug, Deserialize)]
pub struct GraphQuery {
    pub days: Option<u32>,
}

/// `GET /analytics/graph/{script_id}` — daily visit counts for the last
/// `days` calendar days (default 5), zero-filled.
///
/// The window is anchored to UTC day boundaries: records are fetched by
/// server creation time from midnight of `today - (days - 1)`, then
/// bucketed by their client-reported timestamp. The series is always
/// exactly `days` entries long, oldest first.
#[tracing::instrument(skip(state))]
pub async fn graph_analytics(
    State(state): State<Arc<AppState>>,
    Path(script_id): Path<String>,
    Query(query): Query<GraphQuery>,
) -> Result<impl IntoResponse, AppError> {
    let days = resolve_graph_days(query.days);
    let today = Utc::now().date_naive();

    let visits = state
        .store
        .visits_since(&script_id, graph_window_start(today, days))
        .await?;

    Ok(Json(json!({
        "graphData": daily_visit_counts(&visits, today, days),
    })))
}
