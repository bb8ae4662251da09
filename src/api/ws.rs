//! Market snapshot WebSocket endpoint

use super::ApiState;
use crate::broadcast::{run_subscriber, SinkClosed, SnapshotSink};
use async_trait::async_trait;
use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::IntoResponse,
};

#[async_trait]
impl SnapshotSink for WebSocket {
    async fn send_text(&mut self, text: String) -> Result<(), SinkClosed> {
        self.send(Message::Text(text)).await.map_err(|_| SinkClosed)
    }

    async fn closed(&mut self) {
        loop {
            match self.recv().await {
                None | Some(Err(_)) | Some(Ok(Message::Close(_))) => return,
                // Subscribers have nothing to say; ignore chatter
                Some(Ok(_)) => continue,
            }
        }
    }
}

// GET /ws/market
pub async fn ws_market(ws: WebSocketUpgrade, State(state): State<ApiState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move {
        tracing::info!("Market subscriber connected");
        let exit = run_subscriber(
            socket,
            state.facade.store().clone(),
            state.broadcast.clone(),
            state.shutdown.clone(),
        )
        .await;
        tracing::info!(?exit, "Market subscriber disconnected");
    })
}
