//! Integration tests for the Binance ticker feed against a local mock server

use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{Request, Response};
use tokio_tungstenite::tungstenite::Message;
use trademind::feed::{spawn_ingestion, BinanceTickerFeed};
use trademind::shutdown;
use trademind::store::PriceStore;
use trademind::ws::ReconnectPolicy;

fn ticker(symbol: &str, price: &str) -> String {
    format!(
        r#"{{"e":"24hrTicker","E":1704067200000,"s":"{}","c":"{}","P":"1.25"}}"#,
        symbol, price
    )
}

/// Serves two connections: the first sends a few frames then closes, the
/// second sends one frame and stays open. Reports each request path.
async fn spawn_mock_exchange() -> (String, mpsc::UnboundedReceiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (path_tx, path_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        for round in 0..2 {
            let (stream, _) = listener.accept().await.unwrap();
            let path_tx = path_tx.clone();
            let mut ws = accept_hdr_async(stream, move |req: &Request, resp: Response| {
                let _ = path_tx.send(req.uri().path().to_string());
                Ok(resp)
            })
            .await
            .unwrap();

            if round == 0 {
                ws.send(Message::Text(ticker("BTCUSDT", "100.5"))).await.unwrap();
                ws.send(Message::Text("garbage".to_string())).await.unwrap();
                ws.send(Message::Text(ticker("ETHUSDT", "2500"))).await.unwrap();
                let _ = ws.close(None).await;
            } else {
                ws.send(Message::Text(ticker("BTCUSDT", "101.5"))).await.unwrap();
                while let Some(Ok(_)) = ws.next().await {}
            }
        }
    });

    (format!("ws://{}/ws", addr), path_rx)
}

#[tokio::test]
async fn test_feed_ingests_and_resumes_after_server_close() {
    let (base_url, mut paths) = spawn_mock_exchange().await;
    let store = PriceStore::new(["BTCUSDT", "ETHUSDT"], 100);
    let (trigger, shutdown) = shutdown::channel();

    let feed = BinanceTickerFeed::with_base_url(base_url, ["BTCUSDT", "ETHUSDT"]).with_reconnect(
        ReconnectPolicy::new(0, Duration::from_millis(10), Duration::from_millis(50)),
    );
    let ingestion = spawn_ingestion(&feed, store.clone(), shutdown)
        .await
        .unwrap();

    tokio::time::timeout(Duration::from_secs(5), async {
        while store.history("BTCUSDT").await.len() < 2 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("feed did not resume after reconnect");

    assert_eq!(store.history("BTCUSDT").await, vec![100.5, 101.5]);
    assert_eq!(store.history("ETHUSDT").await, vec![2500.0]);

    let quote = store.quote("BTCUSDT").await.unwrap();
    assert_eq!(quote.price, 101.5);
    assert_eq!(quote.change_percent, 1.25);

    for _ in 0..2 {
        assert_eq!(
            paths.recv().await.unwrap(),
            "/ws/btcusdt@ticker/ethusdt@ticker"
        );
    }

    trigger.trigger();
    let applied = tokio::time::timeout(Duration::from_secs(5), ingestion)
        .await
        .expect("ingestion did not stop on shutdown")
        .unwrap();
    assert_eq!(applied, 3);
}

#[tokio::test]
async fn test_feed_keeps_retrying_unreachable_endpoint() {
    let store = PriceStore::new(["BTCUSDT"], 100);
    let (trigger, shutdown) = shutdown::channel();

    let feed = BinanceTickerFeed::with_base_url("ws://127.0.0.1:1/ws", ["BTCUSDT"])
        .with_reconnect(ReconnectPolicy::new(
            0,
            Duration::from_millis(5),
            Duration::from_millis(20),
        ));
    let ingestion = spawn_ingestion(&feed, store.clone(), shutdown)
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!ingestion.is_finished());
    assert!(store.history("BTCUSDT").await.is_empty());

    trigger.trigger();
    let applied = tokio::time::timeout(Duration::from_secs(5), ingestion)
        .await
        .expect("ingestion did not stop on shutdown")
        .unwrap();
    assert_eq!(applied, 0);
}
