use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use visitlogger_core::visit::TrackPayload;

use crate::{error::AppError, state::AppState};

/// `POST /track` — ingest one visit beacon.
///
/// Required: `scriptId`, `userId`, `ipAddress`, `timestamp`, `userAgent` —
/// any absent or empty → 400 with no record created. Optional geolocation,
/// time-spent, and page-view fields are coerced to strings with their
/// documented defaults.
///
/// Exactly one new record per successful call. Repeated identical beacons
/// (an unload handler firing twice) each create their own record; there is
/// no deduplication. Unknown `scriptId` values are accepted — correlation
/// with an issued script is by shared key only, never enforced.
#[tracing::instrument(skip(state, payload))]
pub async fn track(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TrackPayload>,
) -> Result<impl IntoResponse, AppError> {
    let visit = payload
        .normalize()
        .map_err(|e| AppError::MissingFields(format!("Missing required fields: {}", e.0)))?;

    state.store.create_visit(&visit).await?;

    Ok(Json(json!({ "message": "Tracking data saved successfully" })))
}
