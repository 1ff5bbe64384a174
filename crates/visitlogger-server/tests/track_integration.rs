mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use common::{json_body, setup, setup_failing, track_request};

fn full_beacon() -> serde_json::Value {
    json!({
        "scriptId": "script-1",
        "userId": "user-1",
        "ipAddress": "blog.example.com",
        "timestamp": "2026-08-04T10:00:00.000Z",
        "userAgent": "Mozilla/5.0 Chrome/120",
        "timeSpent": 42.5,
        "city": "Berlin",
        "latitude": 52.52,
        "longitude": 13.405,
        "pageViews": 2
    })
}

// ============================================================
// Ingest a valid beacon
// ============================================================
#[tokio::test]
async fn test_track_persists_one_normalized_record() {
    let (store, app) = setup();

    let response = app
        .oneshot(track_request(&full_beacon().to_string()))
        .await
        .expect("request");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body, json!({ "message": "Tracking data saved successfully" }));

    let visits = store.stored_visits();
    assert_eq!(visits.len(), 1);
    let visit = &visits[0];
    assert_eq!(visit.script_id, "script-1");
    assert_eq!(visit.ip_address, "blog.example.com");
    // Numeric payload fields are stored string-encoded.
    assert_eq!(visit.time_spent, "42.5");
    assert_eq!(visit.latitude, "52.52");
    assert_eq!(visit.longitude, "13.405");
    assert_eq!(visit.page_views, "2");
    assert!(!visit.id.is_empty());
}

#[tokio::test]
async fn test_track_applies_defaults_for_omitted_optionals() {
    let (store, app) = setup();

    let body = json!({
        "scriptId": "script-1",
        "userId": "user-1",
        "ipAddress": "blog.example.com",
        "timestamp": "2026-08-04T10:00:00.000Z",
        "userAgent": "Mozilla/5.0"
    });

    let response = app
        .oneshot(track_request(&body.to_string()))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);

    let visits = store.stored_visits();
    assert_eq!(visits.len(), 1);
    assert_eq!(visits[0].city, "Unknown");
    assert_eq!(visits[0].latitude, "0");
    assert_eq!(visits[0].longitude, "0");
    assert_eq!(visits[0].time_spent, "0");
    assert_eq!(visits[0].page_views, "1");
}

// ============================================================
// Required-field validation
// ============================================================
#[tokio::test]
async fn test_track_missing_required_field_is_400_with_no_record() {
    let (store, app) = setup();

    let body = json!({
        "scriptId": "script-1",
        "userId": "user-1",
        "timestamp": "2026-08-04T10:00:00.000Z",
        "userAgent": "Mozilla/5.0"
    });

    let response = app
        .oneshot(track_request(&body.to_string()))
        .await
        .expect("request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    let message = body["error"].as_str().expect("error message");
    assert!(message.starts_with("Missing required fields"));
    assert!(message.contains("ipAddress"));

    assert!(store.stored_visits().is_empty());
}

#[tokio::test]
async fn test_track_empty_required_field_counts_as_missing() {
    let (store, app) = setup();

    let mut body = full_beacon();
    body["userId"] = json!("");

    let response = app
        .oneshot(track_request(&body.to_string()))
        .await
        .expect("request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(store.stored_visits().is_empty());
}

// ============================================================
// Duplicate beacons are kept, never deduplicated
// ============================================================
#[tokio::test]
async fn test_track_identical_beacons_create_two_records() {
    let (store, app) = setup();
    let body = full_beacon().to_string();

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(track_request(&body))
            .await
            .expect("request");
        assert_eq!(response.status(), StatusCode::OK);
    }

    // An unload beacon firing twice is expected to land twice.
    let visits = store.stored_visits();
    assert_eq!(visits.len(), 2);
    assert_ne!(visits[0].id, visits[1].id);
    assert_eq!(visits[0].script_id, visits[1].script_id);
}

// ============================================================
// Store failure
// ============================================================
#[tokio::test]
async fn test_track_store_failure_is_generic_500() {
    let app = setup_failing();

    let response = app
        .oneshot(track_request(&full_beacon().to_string()))
        .await
        .expect("request");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    // No store detail leaks to the caller.
    assert_eq!(body, json!({ "error": "Internal server error" }));
}
