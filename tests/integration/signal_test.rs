//! Integration tests: feed messages through the store to signals

use std::sync::Arc;
use trademind::feed::decode_ticker;
use trademind::query::QueryFacade;
use trademind::sentiment::CannedSentiment;
use trademind::signal::{generate_signal, SignalAction};
use trademind::store::PriceStore;

const DOWNTREND: [f64; 20] = [
    100.0, 102.0, 101.0, 98.0, 95.0, 90.0, 88.0, 85.0, 83.0, 80.0, 78.0, 75.0, 73.0, 70.0, 68.0,
    65.0, 63.0, 60.0, 58.0, 55.0,
];

fn ticker_json(symbol: &str, price: f64) -> String {
    format!(
        r#"{{"e":"24hrTicker","E":1704067200000,"s":"{}","c":"{:.8}","P":"-0.42"}}"#,
        symbol, price
    )
}

fn facade() -> QueryFacade {
    QueryFacade::new(
        PriceStore::new(["BTCUSDT", "ETHUSDT"], 100),
        Arc::new(CannedSentiment::new()),
    )
}

#[tokio::test]
async fn test_downtrend_ticks_yield_oversold_buy() {
    let facade = facade();
    for price in DOWNTREND {
        let tick = decode_ticker(&ticker_json("BTCUSDT", price)).unwrap();
        facade.store().apply(&tick).await;
    }

    assert_eq!(facade.store().history("BTCUSDT").await, DOWNTREND.to_vec());

    let signal = facade.signal("btcusdt").await;
    assert!(signal.rsi.unwrap() < 30.0);
    assert_eq!(signal.signal, SignalAction::Buy);
    assert!(signal.reason.starts_with("Oversold"), "{}", signal.reason);
}

#[tokio::test]
async fn test_malformed_ticks_do_not_reach_store() {
    let facade = facade();
    let messages = [
        ticker_json("BTCUSDT", 100.0),
        r#"{"s":"BTCUSDT","c":"oops","P":"0"}"#.to_string(),
        r#"{"result":null,"id":1}"#.to_string(),
        ticker_json("BTCUSDT", 101.0),
    ];

    for msg in &messages {
        if let Ok(tick) = decode_ticker(msg) {
            facade.store().apply(&tick).await;
        }
    }

    assert_eq!(facade.store().history("BTCUSDT").await, vec![100.0, 101.0]);
}

#[tokio::test]
async fn test_signal_tracks_rolling_window() {
    let facade = facade();

    for i in 0..19 {
        facade
            .store()
            .apply(&decode_ticker(&ticker_json("ETHUSDT", 2000.0 + i as f64)).unwrap())
            .await;
        assert_eq!(facade.signal("ETHUSDT").await.reason, "Insufficient data");
    }

    facade
        .store()
        .apply(&decode_ticker(&ticker_json("ETHUSDT", 2019.0)).unwrap())
        .await;
    let signal = facade.signal("ETHUSDT").await;
    assert_eq!(signal.signal, SignalAction::Sell);
    assert!(signal.reason.starts_with("Overbought"));

    // Well past capacity the window only holds the latest 100 prices
    for i in 0..150 {
        facade
            .store()
            .apply(&decode_ticker(&ticker_json("ETHUSDT", 3000.0 - i as f64)).unwrap())
            .await;
    }
    let history = facade.store().history("ETHUSDT").await;
    assert_eq!(history.len(), 100);
    assert_eq!(facade.signal("ETHUSDT").await.signal, SignalAction::Buy);
}

#[test]
fn test_insufficient_data_regardless_of_values() {
    for len in 0..20 {
        let rising: Vec<f64> = (0..len).map(|i| i as f64 * 10.0).collect();
        let falling: Vec<f64> = rising.iter().rev().copied().collect();
        for prices in [rising, falling] {
            let signal = generate_signal("BTCUSDT", &prices);
            assert_eq!(signal.signal, SignalAction::Neutral);
            assert_eq!(signal.reason, "Insufficient data");
        }
    }
}

#[test]
fn test_flat_history_has_defined_outcome() {
    let signal = generate_signal("BTCUSDT", &[100.0; 20]);
    assert_eq!(signal.rsi, Some(50.0));
    assert_eq!(signal.signal, SignalAction::Neutral);
    assert_eq!(signal.reason, "Market stable");
}
