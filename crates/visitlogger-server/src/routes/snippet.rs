use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::state::AppState;

/// The client-side tracker, templated per request with the two identifiers
/// and the beacon endpoint.
const TRACKER_TEMPLATE: &str = include_str!("tracker.js");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnippetQuery {
    pub script_id: Option<String>,
    pub user_id: Option<String>,
}

/// `GET /track.js` — serve the parameterized client snippet.
///
/// This endpoint degrades to a JavaScript comment on missing parameters
/// rather than a JSON envelope: the response lands in a `<script>` tag, so
/// it must stay syntactically valid JavaScript either way.
#[tracing::instrument(skip(state))]
pub async fn serve_snippet(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SnippetQuery>,
) -> Response {
    let (script_id, user_id) = match (
        query.script_id.filter(|s| !s.is_empty()),
        query.user_id.filter(|u| !u.is_empty()),
    ) {
        (Some(s), Some(u)) => (s, u),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/javascript")],
                "// Missing scriptId or userId",
            )
                .into_response();
        }
    };

    let body = render_snippet(&script_id, &user_id, &state.config.public_url);
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        body,
    )
        .into_response()
}

/// Substitute the template placeholders. Values are JSON-encoded so a
/// hostile query string cannot break out of the embedded string literals.
fn render_snippet(script_id: &str, user_id: &str, public_url: &str) -> String {
    TRACKER_TEMPLATE
        .replace("__SCRIPT_ID__", &encode(script_id))
        .replace("__USER_ID__", &encode(user_id))
        .replace("__ENDPOINT__", &encode(public_url.trim_end_matches('/')))
}

fn encode(value: &str) -> String {
    // String-to-JSON serialization cannot fail.
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}
