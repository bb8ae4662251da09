//! HTTP and WebSocket surface
//!
//! Thin axum layer over the query facade and the broadcast loop.

mod handlers;
mod ws;

pub use handlers::HealthResponse;

use crate::broadcast::BroadcastConfig;
use crate::query::QueryFacade;
use crate::shutdown::Shutdown;
use axum::{routing::get, Router};
use tokio::net::TcpListener;

/// Shared state for all routes
#[derive(Clone)]
pub struct ApiState {
    pub facade: QueryFacade,
    pub broadcast: BroadcastConfig,
    pub shutdown: Shutdown,
}

/// Build the application router
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/signals/:symbol", get(handlers::get_signal))
        .route("/api/ai/insight/:symbol", get(handlers::get_insight))
        .route("/api/prices", get(handlers::get_prices))
        .route("/ws/market", get(ws::ws_market))
        .with_state(state)
}

/// Serve the router on `listener` until shutdown fires
pub async fn serve(listener: TcpListener, state: ApiState) -> anyhow::Result<()> {
    let mut shutdown = state.shutdown.clone();
    let router = create_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.recv().await })
        .await?;

    Ok(())
}
