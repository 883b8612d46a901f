//! docmirror server entry point.
//!
//! Boots the refresh scheduler and serves the admin tools over stdio.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use docmirror_client::{FetchClient, FetchConfig, Refresher, Scheduler};
use docmirror_core::{AppConfig, CacheDb, DocumentStore};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tokio::time::Instant;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(
        db_path = %config.db_path.display(),
        source_host = %config.source_host,
        refresh_interval_secs = config.refresh_interval_secs,
        fetch_pause_ms = config.fetch_pause_ms,
        "Starting docmirror server on stdio transport"
    );

    let store: Arc<dyn DocumentStore> = Arc::new(CacheDb::open(&config.db_path).await?);
    let fetcher = Arc::new(FetchClient::new(FetchConfig::from(&config))?);
    let refresher = Arc::new(Refresher::new(store.clone(), fetcher).with_pause(config.fetch_pause()));

    let period = config.refresh_interval();
    let scheduler = Arc::new(if config.refresh_on_start {
        Scheduler::start_at(refresher, period, Instant::now())
    } else {
        Scheduler::start(refresher, period)
    });

    let handler = handler::DocMirrorServer::new(store, scheduler.clone());
    let server = serve_server(handler, stdio()).await?;
    server.waiting().await?;

    scheduler.stop().await;
    tracing::info!("docmirror server stopped");

    Ok(())
}
