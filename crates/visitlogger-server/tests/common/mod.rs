//! Shared helpers for the server integration tests: a fake in-memory
//! `VisitStore`, a store that always fails, and request/body utilities.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex as StdMutex;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use chrono::{DateTime, Duration, Utc};
use http_body_util::BodyExt;
use serde_json::Value;

use visitlogger_core::config::Config;
use visitlogger_core::script::TrackingScript;
use visitlogger_core::store::{StoreError, VisitPage, VisitStore};
use visitlogger_core::visit::VisitEvent;
use visitlogger_server::app::build_app;
use visitlogger_server::state::AppState;

/// Build a test Config with sensible defaults for integration tests.
pub fn test_config() -> Config {
    Config {
        port: 0,
        appwrite_endpoint: "http://localhost:1/v1".to_string(),
        appwrite_project_id: "test-project".to_string(),
        appwrite_api_key: "test-key".to_string(),
        database_id: "main".to_string(),
        events_collection_id: "events".to_string(),
        scripts_collection_id: "scripts".to_string(),
        public_url: "http://localhost:3000".to_string(),
        rate_limit_disable: true,
    }
}

/// In-memory stand-in for the document store.
///
/// Creation timestamps are stamped strictly increasing per insert so
/// "ordered by creation time descending" is deterministic regardless of how
/// fast the test inserts.
pub struct MemoryStore {
    visits: StdMutex<Vec<VisitEvent>>,
    scripts: StdMutex<Vec<TrackingScript>>,
    base: DateTime<Utc>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            visits: StdMutex::new(Vec::new()),
            scripts: StdMutex::new(Vec::new()),
            base: Utc::now(),
        }
    }

    pub fn stored_visits(&self) -> Vec<VisitEvent> {
        self.visits.lock().expect("visits lock").clone()
    }

    pub fn stored_scripts(&self) -> Vec<TrackingScript> {
        self.scripts.lock().expect("scripts lock").clone()
    }
}

#[async_trait]
impl VisitStore for MemoryStore {
    async fn create_visit(&self, visit: &VisitEvent) -> Result<(), StoreError> {
        let mut visits = self.visits.lock().expect("visits lock");
        let mut stored = visit.clone();
        stored.created_at = self.base + Duration::seconds(visits.len() as i64);
        visits.push(stored);
        Ok(())
    }

    async fn list_visits(
        &self,
        script_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<VisitPage, StoreError> {
        let visits = self.visits.lock().expect("visits lock");
        let mut matching: Vec<VisitEvent> = visits
            .iter()
            .filter(|v| v.script_id == script_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = matching.len() as u64;
        let documents = matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok(VisitPage { documents, total })
    }

    async fn visits_since(
        &self,
        script_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<VisitEvent>, StoreError> {
        let visits = self.visits.lock().expect("visits lock");
        Ok(visits
            .iter()
            .filter(|v| v.script_id == script_id && v.created_at >= since)
            .cloned()
            .collect())
    }

    async fn create_script(&self, script: &TrackingScript) -> Result<(), StoreError> {
        self.scripts.lock().expect("scripts lock").push(script.clone());
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// A store whose every operation fails, for the generic-500 paths.
pub struct FailingStore;

#[async_trait]
impl VisitStore for FailingStore {
    async fn create_visit(&self, _visit: &VisitEvent) -> Result<(), StoreError> {
        Err(unavailable())
    }

    async fn list_visits(
        &self,
        _script_id: &str,
        _offset: u64,
        _limit: u64,
    ) -> Result<VisitPage, StoreError> {
        Err(unavailable())
    }

    async fn visits_since(
        &self,
        _script_id: &str,
        _since: DateTime<Utc>,
    ) -> Result<Vec<VisitEvent>, StoreError> {
        Err(unavailable())
    }

    async fn create_script(&self, _script: &TrackingScript) -> Result<(), StoreError> {
        Err(unavailable())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(unavailable())
    }
}

fn unavailable() -> StoreError {
    StoreError::Unavailable("connection refused".to_string())
}

/// Fresh in-memory store + state + app.
pub fn setup() -> (Arc<MemoryStore>, axum::Router) {
    setup_with_config(test_config())
}

pub fn setup_with_config(config: Config) -> (Arc<MemoryStore>, axum::Router) {
    let store = Arc::new(MemoryStore::new());
    let state = Arc::new(AppState::new(Arc::clone(&store) as Arc<dyn VisitStore>, config));
    (store, build_app(state))
}

pub fn setup_failing() -> axum::Router {
    let state = Arc::new(AppState::new(Arc::new(FailingStore), test_config()));
    build_app(state)
}

/// POST /track with the given JSON body and beacon-ish headers.
pub fn track_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/track")
        .header("content-type", "application/json")
        .header("x-forwarded-for", "1.2.3.4")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

/// POST /script with the given JSON body.
pub fn script_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/script")
        .header("content-type", "application/json")
        .header("x-forwarded-for", "1.2.3.4")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("x-forwarded-for", "1.2.3.4")
        .body(Body::empty())
        .expect("build request")
}

/// Extract the JSON body from a response.
pub async fn json_body(response: axum::http::Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("parse JSON")
}

pub async fn text_body(response: axum::http::Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}
