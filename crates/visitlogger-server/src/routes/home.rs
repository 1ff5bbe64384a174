use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use serde_json::json;

use crate::state::AppState;

const HOME_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>VisitLogger</title>
  </head>
  <body>
    <h1>Welcome to the VisitLogger backend!</h1>
    <p>This service collects visit beacons and serves analytics aggregates.</p>
    <p>Issue a tracking script via <code>POST /script</code>, embed the returned URL, and read analytics from <code>/analytics/&lt;scriptId&gt;</code>.</p>
  </body>
</html>
"#;

/// `GET /` — static info page.
pub async fn home() -> Html<&'static str> {
    Html(HOME_PAGE)
}

/// `GET /health` — liveness check.
///
/// Returns `200 OK` when the document store answers a probe, `503` when it
/// does not.
#[tracing::instrument(skip(state))]
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "version": env!("CARGO_PKG_VERSION")
            })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "health check: store unreachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "version": env!("CARGO_PKG_VERSION")
                })),
            )
        }
    }
}
