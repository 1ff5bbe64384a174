use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use visitlogger_appwrite::AppwriteStore;
use visitlogger_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Structured JSON logging. Level controlled via RUST_LOG env var.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("visitlogger_server=info".parse()?),
        )
        .json()
        .init();

    let cfg = visitlogger_core::config::Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    // One store client for the process lifetime, handed to every handler
    // through AppState.
    let store = Arc::new(AppwriteStore::from_config(&cfg)?);
    let state = Arc::new(AppState::new(store, cfg.clone()));

    let addr = format!("0.0.0.0:{}", cfg.port);
    let app = visitlogger_server::app::build_app(Arc::clone(&state));

    info!(port = cfg.port, public_url = %cfg.public_url, "VisitLogger listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
