use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};

use visitlogger_core::script::{IssueScriptPayload, TrackingScript};

use crate::{error::AppError, state::AppState};

/// `POST /script` — issue a fresh tracking script.
///
/// Requires `userId` and `scriptName`. Responds with the generated
/// `scriptId` and the `scriptUrl` the owner embeds; both identifiers are
/// baked into the URL so the served snippet can self-report them. Names are
/// not deduplicated — issuing twice under one name yields two scripts.
#[tracing::instrument(skip(state, payload))]
pub async fn issue_script(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<IssueScriptPayload>,
) -> Result<impl IntoResponse, AppError> {
    let (user_id, script_name) = match (
        payload.user_id.filter(|u| !u.is_empty()),
        payload.script_name.filter(|n| !n.is_empty()),
    ) {
        (Some(u), Some(n)) => (u, n),
        _ => {
            return Err(AppError::MissingFields(
                "userId and scriptName are required".to_string(),
            ));
        }
    };

    let script = TrackingScript::issue(user_id, script_name, &state.config.public_url);
    state.store.create_script(&script).await?;

    Ok(Json(script))
}
