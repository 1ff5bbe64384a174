use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;

use visitlogger_core::config::Config;
use visitlogger_core::store::VisitStore;

/// Shared application state injected into every Axum handler via
/// [`axum::extract::State`].
///
/// The store handle is constructed once at startup and passed in explicitly
/// — handlers never reach for ambient globals, and tests substitute an
/// in-memory fake behind the same trait object.
pub struct AppState {
    pub store: Arc<dyn VisitStore>,

    /// Parsed configuration, loaded once at startup from environment
    /// variables.
    pub config: Arc<Config>,

    /// Per-caller sliding-window rate limiter.
    ///
    /// Key: limiter scope + client IP. Value: deque of request timestamps
    /// within the last 60 seconds.
    rate_limiter: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl AppState {
    pub fn new(store: Arc<dyn VisitStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
            rate_limiter: Mutex::new(HashMap::new()),
        }
    }

    /// Check whether `key` is within `max_per_min` requests for the current
    /// 60-second window.
    ///
    /// Returns `true` if the request should proceed, `false` if it should be
    /// rejected with 429. Slides the window on every call. Disabled entirely
    /// when `config.rate_limit_disable` is set (test hook).
    pub async fn check_rate_limit_with_max(&self, key: &str, max_per_min: usize) -> bool {
        if self.config.rate_limit_disable {
            return true;
        }

        let mut map = self.rate_limiter.lock().await;
        let window = map.entry(key.to_string()).or_default();
        let cutoff = Instant::now() - std::time::Duration::from_secs(60);
        while window.front().is_some_and(|t| *t < cutoff) {
            window.pop_front();
        }
        if window.len() >= max_per_min {
            return false;
        }
        window.push_back(Instant::now());
        true
    }
}
