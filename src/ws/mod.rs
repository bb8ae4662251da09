//! WebSocket client library
//!
//! Streaming client used by the price feed: automatic reconnection with
//! exponential backoff, keepalive pings and cooperative shutdown.

mod client;
mod types;

pub use client::WsClient;
pub use types::{Backoff, ReconnectPolicy, WsConfig, WsError, WsMessage};
