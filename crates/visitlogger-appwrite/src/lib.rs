//! Appwrite document-store backend.
//!
//! Implements [`VisitStore`] against the Appwrite REST documents API with a
//! single long-lived [`reqwest::Client`]. The store is treated as an opaque
//! collaborator: create, list, filter, sort, paginate — nothing else.

pub mod document;
pub mod query;

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::StatusCode;
use tracing::warn;
use url::Url;

use visitlogger_core::config::Config;
use visitlogger_core::script::TrackingScript;
use visitlogger_core::store::{StoreError, VisitPage, VisitStore};
use visitlogger_core::visit::VisitEvent;

use document::{DocumentList, ScriptData, VisitData};

/// Chunk size for the fetch-all path. Appwrite caps a single list call at
/// its own page ceiling, so aggregates must page through the collection
/// rather than trust one call to return everything.
const FETCH_PAGE_SIZE: u64 = 100;

/// Per-call deadline, kept under the server's blanket request timeout so a
/// slow store surfaces as a storage error rather than an aborted request.
const STORE_CALL_TIMEOUT: Duration = Duration::from_secs(10);

pub struct AppwriteStore {
    client: reqwest::Client,
    endpoint: Url,
    project_id: String,
    api_key: String,
    database_id: String,
    events_collection_id: String,
    scripts_collection_id: String,
}

impl AppwriteStore {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let endpoint = Url::parse(&config.appwrite_endpoint)
            .map_err(|e| anyhow::anyhow!("invalid APPWRITE_ENDPOINT: {e}"))?;
        let client = reqwest::Client::builder()
            .timeout(STORE_CALL_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            endpoint,
            project_id: config.appwrite_project_id.clone(),
            api_key: config.appwrite_api_key.clone(),
            database_id: config.database_id.clone(),
            events_collection_id: config.events_collection_id.clone(),
            scripts_collection_id: config.scripts_collection_id.clone(),
        })
    }

    fn documents_url(&self, collection_id: &str) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.endpoint.as_str().trim_end_matches('/'),
            self.database_id,
            collection_id
        )
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("X-Appwrite-Project", &self.project_id)
            .header("X-Appwrite-Key", &self.api_key)
    }

    async fn list_documents(
        &self,
        queries: &[String],
    ) -> Result<DocumentList, StoreError> {
        let params: Vec<(&str, &str)> = queries
            .iter()
            .map(|q| ("queries[]", q.as_str()))
            .collect();
        let response = self
            .request(self.client.get(self.documents_url(&self.events_collection_id)))
            .query(&params)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let body = check(response).await?;
        serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn create_document<T: serde::Serialize>(
        &self,
        collection_id: &str,
        document_id: &str,
        data: T,
    ) -> Result<(), StoreError> {
        let response = self
            .request(self.client.post(self.documents_url(collection_id)))
            .json(&serde_json::json!({ "documentId": document_id, "data": data }))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        check(response).await?;
        Ok(())
    }
}

/// Surface a non-success store response as [`StoreError::Rejected`],
/// otherwise hand back the body text for decoding.
async fn check(response: reqwest::Response) -> Result<String, StoreError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;
    if status.is_success() {
        return Ok(body);
    }
    let message = rejection_message(status, &body);
    warn!(status = status.as_u16(), %message, "Appwrite rejected request");
    Err(StoreError::Rejected {
        status: status.as_u16(),
        message,
    })
}

/// Appwrite error bodies are `{"message": ..., "code": ...}`; fall back to
/// the raw text, truncated, when the body is not that shape.
fn rejection_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| {
            let mut text: String = body.chars().take(200).collect();
            if text.is_empty() {
                text = status.to_string();
            }
            text
        })
}

#[async_trait::async_trait]
impl VisitStore for AppwriteStore {
    async fn create_visit(&self, visit: &VisitEvent) -> Result<(), StoreError> {
        self.create_document(
            &self.events_collection_id,
            &visit.id,
            VisitData::from(visit),
        )
        .await
    }

    async fn list_visits(
        &self,
        script_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<VisitPage, StoreError> {
        let list = self
            .list_documents(&[
                query::equal("scriptId", script_id),
                query::order_desc("$createdAt"),
                query::limit(limit),
                query::offset(offset),
            ])
            .await?;

        Ok(VisitPage {
            total: list.total,
            documents: list.documents.into_iter().map(VisitEvent::from).collect(),
        })
    }

    async fn visits_since(
        &self,
        script_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<VisitEvent>, StoreError> {
        let since = since.to_rfc3339_opts(SecondsFormat::Millis, true);
        let mut visits: Vec<VisitEvent> = Vec::new();

        loop {
            let list = self
                .list_documents(&[
                    query::equal("scriptId", script_id),
                    query::greater_than_equal("$createdAt", &since),
                    query::order_desc("$createdAt"),
                    query::limit(FETCH_PAGE_SIZE),
                    query::offset(visits.len() as u64),
                ])
                .await?;

            let page_len = list.documents.len();
            visits.extend(list.documents.into_iter().map(VisitEvent::from));

            // A short page or the reported total both mean the window is
            // drained; the empty-page check also guards against a total
            // that moves while we page.
            if page_len == 0 || visits.len() as u64 >= list.total {
                return Ok(visits);
            }
        }
    }

    async fn create_script(&self, script: &TrackingScript) -> Result<(), StoreError> {
        self.create_document(
            &self.scripts_collection_id,
            &script.script_id,
            ScriptData::from(script),
        )
        .await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.list_documents(&[query::limit(1)]).await.map(|_| ())
    }
}
