//! End-to-end tests against the HTTP / WebSocket server

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use trademind::api::{self, ApiState};
use trademind::broadcast::{BroadcastConfig, MarketSnapshot};
use trademind::query::QueryFacade;
use trademind::sentiment::CannedSentiment;
use trademind::shutdown::{self, ShutdownTrigger};
use trademind::store::{AssetClass, PriceStore};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start_server(store: PriceStore) -> (SocketAddr, ShutdownTrigger) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (trigger, shutdown) = shutdown::channel();

    let state = ApiState {
        facade: QueryFacade::new(store, Arc::new(CannedSentiment::new())),
        broadcast: BroadcastConfig {
            interval: Duration::from_millis(20),
            reference_symbol: "BTCUSDT".to_string(),
        },
        shutdown,
    };
    tokio::spawn(api::serve(listener, state));

    (addr, trigger)
}

async fn subscribe(addr: SocketAddr) -> Client {
    let (ws, _) = connect_async(format!("ws://{}/ws/market", addr))
        .await
        .unwrap();
    ws
}

async fn next_snapshot(ws: &mut Client) -> MarketSnapshot {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => return serde_json::from_str(&text).unwrap(),
                Some(Ok(_)) => continue,
                other => panic!("subscriber stream ended: {:?}", other),
            }
        }
    })
    .await
    .expect("no snapshot received")
}

fn tracked_store() -> PriceStore {
    PriceStore::new(["BTCUSDT", "ETHUSDT", "AAPL"], 100)
}

#[tokio::test]
async fn test_health() {
    let (addr, _trigger) = start_server(tracked_store()).await;

    let body: Value = reqwest::get(format!("http://{}/health", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, serde_json::json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_signal_endpoint() {
    let store = tracked_store();
    for i in 0..25 {
        store
            .update("BTCUSDT", 50_000.0 - 100.0 * i as f64, -2.0, AssetClass::Crypto)
            .await;
    }
    let (addr, _trigger) = start_server(store).await;

    let body: Value = reqwest::get(format!("http://{}/api/signals/btcusdt", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["symbol"], "BTCUSDT");
    assert_eq!(body["signal"], "BUY");
    assert!(body["reason"].as_str().unwrap().starts_with("Oversold"));
    assert!(body["rsi"].is_number());

    let body: Value = reqwest::get(format!("http://{}/api/signals/unknown", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["symbol"], "UNKNOWN");
    assert_eq!(body["signal"], "NEUTRAL");
    assert_eq!(body["reason"], "Insufficient data");
}

#[tokio::test]
async fn test_insight_endpoint() {
    let store = tracked_store();
    store.update("ETHUSDT", 2500.0, 0.0, AssetClass::Crypto).await;
    let (addr, _trigger) = start_server(store).await;

    let body: Value = reqwest::get(format!("http://{}/api/ai/insight/aapl", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["symbol"], "AAPL");
    assert_eq!(body["insight"], "Stable trend expected.");

    let body: Value = reqwest::get(format!("http://{}/api/ai/insight/ethusdt", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["symbol"], "ETHUSDT");
    assert!(body["insight"].as_str().unwrap().contains("ETHUSDT"));
}

#[tokio::test]
async fn test_prices_endpoint() {
    let store = tracked_store();
    store.update("ETHUSDT", 2500.0, 1.0, AssetClass::Crypto).await;
    store.update("BTCUSDT", 42000.0, 2.0, AssetClass::Crypto).await;
    let (addr, _trigger) = start_server(store).await;

    let body: Value = reqwest::get(format!("http://{}/api/prices", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let symbols: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["symbol"].as_str().unwrap())
        .collect();
    assert_eq!(symbols, vec!["BTCUSDT", "ETHUSDT"]);
    assert_eq!(body[0]["name"], "BTC");
    assert_eq!(body[0]["type"], "crypto");
}

#[tokio::test]
async fn test_snapshot_contains_store_symbols() {
    let store = tracked_store();
    store.update("BTCUSDT", 42000.0, 0.5, AssetClass::Crypto).await;
    store.update("ETHUSDT", 2500.0, -0.5, AssetClass::Crypto).await;
    let (addr, _trigger) = start_server(store.clone()).await;

    let mut ws = subscribe(addr).await;
    let snapshot = next_snapshot(&mut ws).await;

    let expected: Vec<String> = store.snapshot().await.into_keys().collect();
    assert_eq!(snapshot.data.keys().cloned().collect::<Vec<_>>(), expected);
    assert_eq!(
        snapshot.timestamp,
        Some(store.quote("BTCUSDT").await.unwrap().last_updated)
    );
}

#[tokio::test]
async fn test_snapshot_timestamp_null_without_reference_quote() {
    let store = tracked_store();
    store.update("ETHUSDT", 2500.0, -0.5, AssetClass::Crypto).await;
    let (addr, _trigger) = start_server(store).await;

    let mut ws = subscribe(addr).await;
    let text = loop {
        match ws.next().await {
            Some(Ok(Message::Text(text))) => break text,
            Some(Ok(_)) => continue,
            other => panic!("subscriber stream ended: {:?}", other),
        }
    };
    let raw: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(raw["type"], "all_prices");
    assert!(raw["timestamp"].is_null());
    assert_eq!(raw["data"]["ETHUSDT"]["changePercent"], -0.5);
}

#[tokio::test]
async fn test_disconnecting_one_subscriber_keeps_the_other() {
    let store = tracked_store();
    store.update("BTCUSDT", 42000.0, 0.5, AssetClass::Crypto).await;
    let (addr, _trigger) = start_server(store.clone()).await;

    let mut first = subscribe(addr).await;
    let mut second = subscribe(addr).await;
    next_snapshot(&mut first).await;
    next_snapshot(&mut second).await;

    let _ = first.close(None).await;
    drop(first);

    store.update("BTCUSDT", 42100.0, 0.7, AssetClass::Crypto).await;

    let mut latest = next_snapshot(&mut second).await;
    for _ in 0..10 {
        if latest.data["BTCUSDT"].price == 42100.0 {
            break;
        }
        latest = next_snapshot(&mut second).await;
    }
    assert_eq!(latest.data["BTCUSDT"].price, 42100.0);
}

#[tokio::test]
async fn test_shutdown_closes_subscribers() {
    let (addr, trigger) = start_server(tracked_store()).await;
    let mut ws = subscribe(addr).await;
    next_snapshot(&mut ws).await;

    trigger.trigger();

    let ended = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            match ws.next().await {
                Some(Ok(Message::Text(_))) => continue,
                _ => break,
            }
        }
    })
    .await;
    assert!(ended.is_ok(), "subscriber stream should end after shutdown");
}
