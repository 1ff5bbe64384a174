//! Wire mapping between Appwrite document envelopes and the core types.
//!
//! Appwrite wraps stored attributes in an envelope of `$`-prefixed system
//! fields; `$id` and `$createdAt` map onto `VisitEvent::id`/`created_at`.
//! The creation timestamp is stamped by Appwrite itself, so outbound
//! payloads carry data attributes only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use visitlogger_core::script::TrackingScript;
use visitlogger_core::visit::VisitEvent;

/// Data attributes of a visit document, borrowed from a [`VisitEvent`] for
/// the create call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitData<'a> {
    pub script_id: &'a str,
    pub user_id: &'a str,
    pub ip_address: &'a str,
    pub timestamp: &'a str,
    pub user_agent: &'a str,
    pub time_spent: &'a str,
    pub city: &'a str,
    pub latitude: &'a str,
    pub longitude: &'a str,
    pub page_views: &'a str,
}

impl<'a> From<&'a VisitEvent> for VisitData<'a> {
    fn from(visit: &'a VisitEvent) -> Self {
        Self {
            script_id: &visit.script_id,
            user_id: &visit.user_id,
            ip_address: &visit.ip_address,
            timestamp: &visit.timestamp,
            user_agent: &visit.user_agent,
            time_spent: &visit.time_spent,
            city: &visit.city,
            latitude: &visit.latitude,
            longitude: &visit.longitude,
            page_views: &visit.page_views,
        }
    }
}

/// A visit document as Appwrite returns it. Unlisted system fields
/// (`$permissions`, `$collectionId`, …) are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitDocument {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$createdAt")]
    pub created_at: DateTime<Utc>,
    pub script_id: String,
    pub user_id: String,
    pub ip_address: String,
    pub timestamp: String,
    pub user_agent: String,
    #[serde(default)]
    pub time_spent: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub latitude: Option<String>,
    #[serde(default)]
    pub longitude: Option<String>,
    #[serde(default)]
    pub page_views: Option<String>,
}

impl From<VisitDocument> for VisitEvent {
    fn from(doc: VisitDocument) -> Self {
        // Documents written before a field existed come back null; the
        // ingest-time defaults are reapplied on read.
        Self {
            id: doc.id,
            script_id: doc.script_id,
            user_id: doc.user_id,
            ip_address: doc.ip_address,
            timestamp: doc.timestamp,
            user_agent: doc.user_agent,
            time_spent: doc.time_spent.unwrap_or_else(|| "0".to_string()),
            city: doc.city.unwrap_or_else(|| "Unknown".to_string()),
            latitude: doc.latitude.unwrap_or_else(|| "0".to_string()),
            longitude: doc.longitude.unwrap_or_else(|| "0".to_string()),
            page_views: doc.page_views.unwrap_or_else(|| "1".to_string()),
            created_at: doc.created_at,
        }
    }
}

/// Data attributes of a tracking-script document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptData<'a> {
    pub script_id: &'a str,
    pub user_id: &'a str,
    pub script_name: &'a str,
    pub script_url: &'a str,
}

impl<'a> From<&'a TrackingScript> for ScriptData<'a> {
    fn from(script: &'a TrackingScript) -> Self {
        Self {
            script_id: &script.script_id,
            user_id: &script.user_id,
            script_name: &script.script_name,
            script_url: &script.script_url,
        }
    }
}

/// Response envelope of the list-documents call.
#[derive(Debug, Deserialize)]
pub struct DocumentList {
    pub total: u64,
    pub documents: Vec<VisitDocument>,
}
