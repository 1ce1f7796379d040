//! Serve command implementation.
//!
//! Serves the REST API under `/api`.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;
use typeslot_api::create_api_router;
use typeslot_ops::{Config, TypeslotContext};

/// Start the HTTP server and run until Ctrl-C.
pub async fn execute(config: Config, bind: Option<String>) -> Result<()> {
    let bind = bind.unwrap_or_else(|| config.bind.clone());
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("Invalid bind address: {}", bind))?;

    let ctx = TypeslotContext::from_config(config)?;
    let predictor = ctx.predictor_kind();
    let app = Router::new().nest("/api", create_api_router(ctx));

    println!("🚀 typeslot API listening on http://{}/api", addr);
    info!(%addr, predictor, "Starting server");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the process is killed.
        std::future::pending::<()>().await;
    }
}
