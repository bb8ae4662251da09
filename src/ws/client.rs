//! WebSocket client with automatic reconnection

use super::types::{WsConfig, WsError, WsMessage};
use crate::shutdown::Shutdown;
use crate::telemetry::{self, CounterMetric};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How a single connection ended without a transport error
enum StreamEnd {
    /// Shutdown signalled or the consumer went away
    Stop,
}

/// What to do with one inbound frame
#[derive(Debug, PartialEq)]
enum Inbound {
    Deliver(String),
    Reply(Message),
    PongReceived,
    Ignore,
}

fn classify(frame: Message) -> Result<Inbound, WsError> {
    match frame {
        Message::Text(text) => Ok(Inbound::Deliver(text)),
        Message::Ping(payload) => Ok(Inbound::Reply(Message::Pong(payload))),
        Message::Pong(_) => Ok(Inbound::PongReceived),
        Message::Close(_) => Err(WsError::ClosedByServer),
        Message::Binary(_) | Message::Frame(_) => Ok(Inbound::Ignore),
    }
}

fn send_failed(e: tungstenite::Error) -> WsError {
    WsError::SendFailed(e.to_string())
}

/// Streaming WebSocket client: reconnects with backoff and keeps the link
/// alive with pings. Text frames are forwarded, everything else is handled here.
pub struct WsClient {
    config: WsConfig,
}

impl WsClient {
    pub fn new(config: WsConfig) -> Self {
        Self { config }
    }

    /// Spawn the connection task and return its event stream.
    ///
    /// The task ends when `shutdown` fires, when the receiver is dropped, or
    /// when the reconnect policy gives up (after a final `Disconnected`).
    pub fn connect(&self, shutdown: Shutdown) -> mpsc::Receiver<WsMessage> {
        let (tx, rx) = mpsc::channel(1024);
        let config = self.config.clone();

        tokio::spawn(async move {
            if let Err(e) = Self::run_connection_loop(config, tx, shutdown).await {
                tracing::error!(error = %e, "WebSocket client stopped");
            }
        });

        rx
    }

    /// Run the connection loop with automatic reconnection
    async fn run_connection_loop(
        config: WsConfig,
        tx: mpsc::Sender<WsMessage>,
        mut shutdown: Shutdown,
    ) -> Result<(), WsError> {
        let mut backoff = config.reconnect.backoff();

        loop {
            let opened = tokio::select! {
                opened = Self::open(&config.url) => opened,
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown requested while connecting");
                    return Ok(());
                }
            };

            let error = match opened {
                Ok(socket) => {
                    backoff.reset();
                    if tx.send(WsMessage::Connected).await.is_err() {
                        return Ok(());
                    }
                    match Self::stream(socket, config.ping_interval, &tx, &mut shutdown).await {
                        Ok(StreamEnd::Stop) => return Ok(()),
                        Err(e) => e,
                    }
                }
                Err(e) => e,
            };

            telemetry::increment(CounterMetric::FeedReconnects);
            let Some(delay) = backoff.next_delay() else {
                tracing::error!(
                    error = %error,
                    attempts = backoff.attempts(),
                    "Max reconnection attempts reached"
                );
                let _ = tx.send(WsMessage::Disconnected).await;
                return Err(WsError::MaxReconnectsExceeded);
            };
            tracing::warn!(
                error = %error,
                attempt = backoff.attempts(),
                delay_ms = delay.as_millis() as u64,
                "WebSocket connection lost, reconnecting..."
            );

            if tx
                .send(WsMessage::Reconnecting {
                    attempt: backoff.attempts(),
                })
                .await
                .is_err()
            {
                tracing::info!("Receiver dropped, stopping reconnection");
                return Ok(());
            }

            tokio::select! {
                _ = sleep(delay) => {}
                _ = shutdown.recv() => return Ok(()),
            }
        }
    }

    async fn open(url: &str) -> Result<Socket, WsError> {
        tracing::info!(url = %url, "Connecting to WebSocket");

        let (socket, _response) = connect_async(url)
            .await
            .map_err(|e| WsError::ConnectionFailed(e.to_string()))?;

        tracing::info!("WebSocket connected");
        Ok(socket)
    }

    /// Pump frames from an open connection until it fails or we are told to stop
    async fn stream(
        socket: Socket,
        ping_period: Duration,
        tx: &mpsc::Sender<WsMessage>,
        shutdown: &mut Shutdown,
    ) -> Result<StreamEnd, WsError> {
        let (mut sink, mut frames) = socket.split();

        let mut keepalive = interval_at(Instant::now() + ping_period, ping_period);
        keepalive.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut pong_due = false;

        loop {
            tokio::select! {
                frame = frames.next() => {
                    let frame = frame
                        .ok_or_else(|| WsError::ConnectionFailed("Stream ended unexpectedly".into()))?
                        .map_err(|e| WsError::ConnectionFailed(e.to_string()))?;

                    match classify(frame)? {
                        Inbound::Deliver(text) => {
                            if tx.send(WsMessage::Text(text)).await.is_err() {
                                tracing::debug!("Consumer gone, closing WebSocket");
                                let _ = sink.send(Message::Close(None)).await;
                                return Ok(StreamEnd::Stop);
                            }
                        }
                        Inbound::Reply(reply) => sink.send(reply).await.map_err(send_failed)?,
                        Inbound::PongReceived => pong_due = false,
                        Inbound::Ignore => {}
                    }
                }

                _ = keepalive.tick() => {
                    if pong_due {
                        return Err(WsError::ConnectionFailed("No pong since last ping".into()));
                    }
                    sink.send(Message::Ping(Vec::new())).await.map_err(send_failed)?;
                    pong_due = true;
                }

                _ = shutdown.recv() => {
                    tracing::info!("Shutdown requested, closing WebSocket");
                    let _ = sink.send(Message::Close(None)).await;
                    return Ok(StreamEnd::Stop);
                }
            }
        }
    }
}
