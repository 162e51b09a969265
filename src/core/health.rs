//! Health-check HTTP listener
//!
//! Hosting platforms probe `PORT` to decide whether the bot is alive; the bot
//! itself talks to Telegram by long polling, so this is the only HTTP surface.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::time::Instant;

use crate::core::utils::format_duration;

#[derive(Clone)]
struct HealthState {
    start_time: Instant,
}

/// Builds the router serving `/health` and `/`.
pub fn router() -> Router {
    let state = HealthState {
        start_time: Instant::now(),
    };

    Router::new()
        .route("/health", get(health_handler))
        .route("/", get(root_handler))
        .with_state(Arc::new(state))
}

/// Start the health HTTP server on `0.0.0.0:port`.
pub async fn start_health_server(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    log::info!("Starting health server on http://{}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, router()).await?;

    Ok(())
}

async fn health_handler(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let uptime = state.start_time.elapsed();

    let health_status = serde_json::json!({
        "status": "healthy",
        "uptime_seconds": uptime.as_secs(),
        "uptime_human": format_duration(uptime),
        "service": "filelink-bot",
        "version": env!("CARGO_PKG_VERSION"),
    });

    (StatusCode::OK, axum::Json(health_status))
}

async fn root_handler() -> impl IntoResponse {
    (StatusCode::OK, "filelink bot is running")
}
