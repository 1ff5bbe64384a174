use std::sync::Arc;
use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    http::{header, HeaderValue, StatusCode},
    middleware,
    routing::{get, post},
    BoxError, Json, Router,
};
use serde_json::json;
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::{limit, routes, state::AppState};

/// Blanket deadline applied uniformly to every route. An elapsed deadline
/// aborts the whole handler; the in-flight store write may or may not have
/// landed.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Construct the Axum [`Router`] with all routes and middleware attached.
///
/// Middleware is applied in outer-to-inner order (outermost runs first on
/// request, last on response):
///
/// 1. Security headers — stamped on every response, including errors.
/// 2. `CorsLayer` — wildcard origin: the snippet is embedded on arbitrary
///    third-party sites, and browsers need CORS headers for the beacon.
/// 3. `TraceLayer` — structured request/response logging via `tracing`.
/// 4. Request timeout — fixed 15 s deadline, converted to a generic 500.
/// 5. General per-IP rate limit, with a tighter additional ceiling on the
///    `/track` and `/track.js` paths.
pub fn build_app(state: Arc<AppState>) -> Router {
    let ingest = Router::new()
        .route("/track", post(routes::track::track))
        .route("/track.js", get(routes::snippet::serve_snippet))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            limit::ingest,
        ));

    Router::new()
        .route("/", get(routes::home::home))
        .route("/health", get(routes::home::health))
        .route("/script", post(routes::script::issue_script))
        .route("/analytics/{script_id}", get(routes::analytics::list_analytics))
        .route(
            "/analytics/graph/{script_id}",
            get(routes::analytics::graph_analytics),
        )
        .merge(ingest)
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            limit::general,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(REQUEST_TIMEOUT)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .with_state(state)
}

/// Convert failures from fallible middleware (the timeout layer) into the
/// generic 500 envelope. Detail is logged, never returned.
async fn handle_middleware_error(err: BoxError) -> (StatusCode, Json<serde_json::Value>) {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::error!("request exceeded the {:?} deadline", REQUEST_TIMEOUT);
    } else {
        tracing::error!(error = %err, "middleware failure");
    }
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
}
