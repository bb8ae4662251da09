//! trademind: real-time crypto prices and technical signals
//!
//! This library provides the core components for:
//! - Real-time ticker ingestion from Binance WebSocket streams
//! - A shared price store with bounded per-symbol history
//! - RSI / SMA crossover signal generation
//! - Periodic market snapshots pushed to WebSocket subscribers
//! - A thin HTTP query surface and pluggable sentiment commentary

pub mod api;
pub mod broadcast;
pub mod cli;
pub mod config;
pub mod feed;
pub mod query;
pub mod sentiment;
pub mod shutdown;
pub mod signal;
pub mod store;
pub mod telemetry;
pub mod ws;
