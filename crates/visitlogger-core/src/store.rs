//! Event-store abstraction.
//!
//! All durable state lives in an external document store reached through the
//! create/list/filter/sort/paginate capability below. Handlers never talk to
//! the store vendor directly; they receive an `Arc<dyn VisitStore>` built
//! once at startup, which keeps the backend substitutable in tests.

use chrono::{DateTime, Utc};

use crate::script::TrackingScript;
use crate::visit::VisitEvent;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached at all (connect, TLS, timeout).
    #[error("store unreachable: {0}")]
    Unavailable(String),

    /// The store answered with a non-success status.
    #[error("store rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The store answered 2xx but the body did not decode.
    #[error("malformed store response: {0}")]
    Decode(String),
}

/// One page of a visit listing plus the total matching count, so the
/// dashboard can compute page counts client-side.
#[derive(Debug, Clone)]
pub struct VisitPage {
    pub documents: Vec<VisitEvent>,
    pub total: u64,
}

#[async_trait::async_trait]
pub trait VisitStore: Send + Sync + 'static {
    /// Append one visit record. Exactly one record per successful call; the
    /// store performs no deduplication.
    async fn create_visit(&self, visit: &VisitEvent) -> Result<(), StoreError>;

    /// Records matching `script_id`, ordered by server creation time
    /// descending, skipping `offset` and taking `limit`.
    async fn list_visits(
        &self,
        script_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<VisitPage, StoreError>;

    /// All records matching `script_id` created at or after `since`.
    async fn visits_since(
        &self,
        script_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<VisitEvent>, StoreError>;

    /// Persist a newly issued tracking script, keyed by its `script_id`.
    async fn create_script(&self, script: &TrackingScript) -> Result<(), StoreError>;

    /// Reachability probe for the liveness endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}
