//! Helpdesk API server
//!
//! Serves the JSON facade over the remote ticket store and a Prometheus
//! scrape endpoint.
//!
//! # Usage
//!
//! ```bash
//! export SUPABASE_URL=https://<project>.supabase.co
//! export SUPABASE_ANON_KEY=<anon key>
//! cargo run --bin helpdesk-server
//! ```

use axum::{Router, routing::get};
use helpdesk::{AppState, Config, build_router, cors_layer};
use helpdesk_rest::{RestIdentityProvider, RestTicketStore};
use helpdesk_runtime::metrics::MetricsServer;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Missing remote settings are the only fatal startup condition
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{},helpdesk=debug", config.server.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        remote = %config.remote.url,
        policy = ?config.status_policy,
        "Configuration loaded"
    );

    // Metrics
    let mut metrics = MetricsServer::new(config.server.metrics_addr()?);
    metrics.start()?;
    if let Some(handle) = metrics.handle().cloned() {
        let listener = tokio::net::TcpListener::bind(metrics.addr()).await?;
        let metrics_app = Router::new().route(
            "/metrics",
            get(move || {
                let handle = handle.clone();
                async move { handle.render() }
            }),
        );
        tokio::spawn(async move {
            if let Err(error) = axum::serve(listener, metrics_app).await {
                tracing::error!(%error, "Metrics server stopped");
            }
        });
        tracing::info!(addr = %metrics.addr(), "Metrics endpoint listening");
    }

    let state = AppState::new(
        Arc::new(RestTicketStore::new(config.remote.clone())),
        Arc::new(RestIdentityProvider::new(config.remote.clone())),
        config.status_policy,
    );
    let app = build_router(state).layer(cors_layer(&config.server.cors_origins));

    let addr = config.server.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Helpdesk API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down gracefully...");
        })
        .await?;

    Ok(())
}
