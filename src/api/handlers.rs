//! HTTP handlers

use super::ApiState;
use crate::query::Insight;
use crate::signal::Signal;
use crate::store::Quote;
use axum::{extract::Path, extract::State, response::Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

// GET /api/signals/:symbol
pub async fn get_signal(
    State(state): State<ApiState>,
    Path(symbol): Path<String>,
) -> Json<Signal> {
    let signal = state.facade.signal(&symbol).await;
    tracing::debug!(symbol = %signal.symbol, signal = ?signal.signal, "Signal requested");
    Json(signal)
}

// GET /api/ai/insight/:symbol
pub async fn get_insight(
    State(state): State<ApiState>,
    Path(symbol): Path<String>,
) -> Json<Insight> {
    Json(state.facade.insight(&symbol).await)
}

// GET /api/prices
pub async fn get_prices(State(state): State<ApiState>) -> Json<Vec<Quote>> {
    Json(state.facade.prices().await)
}
