use serde::{Deserialize, Serialize};

/// A site-owner-issued tracking script. Created once via POST /script and
/// never updated; its `script_id` is the correlation key every snippet
/// beacon reports back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrackingScript {
    pub script_id: String,
    pub user_id: String,
    pub script_name: String,
    pub script_url: String,
}

/// Body of POST /script.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueScriptPayload {
    pub user_id: Option<String>,
    pub script_name: Option<String>,
}

impl TrackingScript {
    /// Issue a fresh script for `user_id`. The id is a new uuid and the URL
    /// points at the snippet endpoint parameterized with both identifiers,
    /// so the embedded snippet can self-report them on every beacon.
    /// Script names are not deduplicated; issuing twice under the same name
    /// yields two independent scripts.
    pub fn issue(user_id: String, script_name: String, public_url: &str) -> Self {
        let script_id = uuid::Uuid::new_v4().to_string();
        let script_url = format!(
            "{}/track.js?scriptId={}&userId={}",
            public_url.trim_end_matches('/'),
            script_id,
            user_id
        );
        Self {
            script_id,
            user_id,
            script_name,
            script_url,
        }
    }
}
