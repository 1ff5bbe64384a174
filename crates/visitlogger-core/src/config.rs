#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub appwrite_endpoint: String,
    pub appwrite_project_id: String,
    pub appwrite_api_key: String,
    pub database_id: String,
    /// Collection holding VisitEvent documents.
    pub events_collection_id: String,
    /// Collection holding TrackingScript documents.
    pub scripts_collection_id: String,
    /// Base URL templated into issued script URLs and the snippet's beacon
    /// target.
    pub public_url: String,
    /// Test hook: bypass the per-IP rate limiter entirely.
    pub rate_limit_disable: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|e| format!("invalid PORT: {e}"))?;

        Ok(Self {
            port,
            appwrite_endpoint: required("APPWRITE_ENDPOINT")?,
            appwrite_project_id: required("APPWRITE_PROJECT_ID")?,
            appwrite_api_key: required("APPWRITE_API_KEY")?,
            database_id: required("APPWRITE_DATABASE_ID")?,
            events_collection_id: required("APPWRITE_COLLECTION_ID")?,
            scripts_collection_id: required("APPWRITE_SCRIPTS_COLLECTION_ID")?,
            public_url: std::env::var("VISITLOGGER_PUBLIC_URL")
                .unwrap_or_else(|_| format!("http://localhost:{port}")),
            rate_limit_disable: std::env::var("VISITLOGGER_RATE_LIMIT_DISABLE")
                .map(|v| v == "true")
                .unwrap_or(false),
        })
    }
}

fn required(name: &str) -> Result<String, String> {
    match std::env::var(name) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => Err(format!("{name} is required")),
    }
}
