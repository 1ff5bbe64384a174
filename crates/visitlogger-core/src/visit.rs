use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The payload the tracking snippet beacons to POST /track.
///
/// Optional fields arrive as whatever the client JS produced — string,
/// number, null, or absent — so they are held as raw JSON values until
/// [`TrackPayload::normalize`] coerces them to their stored string form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackPayload {
    pub script_id: Option<String>,
    pub user_id: Option<String>,
    pub ip_address: Option<String>,
    pub timestamp: Option<String>,
    pub user_agent: Option<String>,
    #[serde(default)]
    pub time_spent: Option<Value>,
    #[serde(default)]
    pub city: Option<Value>,
    #[serde(default)]
    pub latitude: Option<Value>,
    #[serde(default)]
    pub longitude: Option<Value>,
    #[serde(default)]
    pub page_views: Option<Value>,
}

/// One stored page-visit record. Wire names stay camelCase to match the
/// dashboard contract; geolocation, time-spent, and page-view counters are
/// serialized as strings, never numbers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VisitEvent {
    pub id: String,
    pub script_id: String,
    pub user_id: String,
    pub ip_address: String,
    /// Client-reported ISO-8601 timestamp, kept verbatim. Drives calendar
    /// bucketing in the graph aggregate; never used for sort order.
    pub timestamp: String,
    pub user_agent: String,
    pub time_spent: String,
    pub city: String,
    pub latitude: String,
    pub longitude: String,
    pub page_views: String,
    /// Server-assigned creation time. Sort key for listings and lower-bound
    /// filter for the graph window.
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
#[error("missing required fields: {0}")]
pub struct MissingFields(pub String);

impl TrackPayload {
    /// Validate required fields and coerce the optional ones into a
    /// [`VisitEvent`] ready for the store, assigning a fresh record id and
    /// the server creation time.
    ///
    /// Required: scriptId, userId, ipAddress, timestamp, userAgent — absent
    /// or empty fails with [`MissingFields`] naming every offender at once.
    pub fn normalize(self) -> Result<VisitEvent, MissingFields> {
        let mut missing = Vec::new();
        let mut require = |name: &'static str, value: Option<String>| match value {
            Some(v) if !v.is_empty() => v,
            _ => {
                missing.push(name);
                String::new()
            }
        };

        let script_id = require("scriptId", self.script_id);
        let user_id = require("userId", self.user_id);
        let ip_address = require("ipAddress", self.ip_address);
        let timestamp = require("timestamp", self.timestamp);
        let user_agent = require("userAgent", self.user_agent);

        if !missing.is_empty() {
            return Err(MissingFields(missing.join(", ")));
        }

        Ok(VisitEvent {
            id: uuid::Uuid::new_v4().to_string(),
            script_id,
            user_id,
            ip_address,
            timestamp,
            user_agent,
            time_spent: coerce_or(self.time_spent, "0"),
            city: coerce_or(self.city, "Unknown"),
            latitude: coerce_or(self.latitude, "0"),
            longitude: coerce_or(self.longitude, "0"),
            page_views: coerce_or(self.page_views, "1"),
            created_at: Utc::now(),
        })
    }
}

/// Stringify an optional JSON value with JS-truthiness defaulting: non-empty
/// strings and non-zero numbers pass through, everything else (absent, null,
/// `""`, `0`) takes the default. Matches what the snippet's consumers expect.
fn coerce_or(value: Option<Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s,
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
        _ => default.to_string(),
    }
}
