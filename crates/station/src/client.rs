// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Real-time room feed client.
//!
//! [`receive_rooms`] opens a single WebSocket connection to the notification
//! server, performs the application-level handshake once the server signals
//! readiness, keeps the connection alive with periodic heartbeats, and
//! delivers each incoming room batch to a caller-supplied callback.
//!
//! # Concurrency
//!
//! Two producer tasks feed one sequential consumer through a bounded mpsc
//! channel: the receive pump forwards inbound frames, and the heartbeat
//! scheduler ticks on a fixed interval. The consumer loop owns the write
//! half, drives the handshake, and invokes the callback, so no two callback
//! invocations ever overlap and events are delivered in processing order.
//!
//! # Lifecycle
//!
//! The call makes exactly one connection attempt and never reconnects on its
//! own; retry and backoff are the caller's policy. On every exit path the
//! socket is closed with a "going away" close frame, then the pump and the
//! heartbeat task are stopped and joined. Cancelling the supplied token
//! returns `Ok(())`; a peer-initiated close and transport or handshake
//! failures return the corresponding [`FeedError`].

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::auth::{UserToken, USER_AGENT};
use crate::error::FeedError;
use crate::message::{self, ClientAction, ServerEvent};
use crate::room::Room;

/// Default WebSocket endpoint of the notification server.
pub const DEFAULT_ENDPOINT: &str = "wss://api.bandoristation.com";

/// Default keep-alive interval.
pub const DEFAULT_HEARTBEAT: Duration = Duration::from_secs(30);

/// Buffered events between the producers and the consumer loop.
const EVENT_CHANNEL_CAPACITY: usize = 16;

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;
type WsTx = SplitSink<WsStream, Message>;
type WsRx = SplitStream<WsStream>;

/// Configuration for one [`receive_rooms`] call. All behavior is explicit
/// here; the client carries no ambient state.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// WebSocket endpoint to connect to.
    pub endpoint: String,
    /// String identifying the calling application in `setClient` and
    /// `heartbeat` messages.
    pub client: String,
    /// Access token attached once during the handshake, if supplied.
    pub token: Option<UserToken>,
    /// Interval between keep-alive heartbeats.
    pub heartbeat_interval: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            client: env!("CARGO_PKG_NAME").to_owned(),
            token: None,
            heartbeat_interval: DEFAULT_HEARTBEAT,
        }
    }
}

/// One event handed from a producer task to the consumer loop.
enum FeedEvent {
    /// The heartbeat interval elapsed.
    HeartbeatDue,
    /// An inbound frame arrived.
    Frame(Message),
    /// Receiving failed; the pump has stopped.
    Failed(tungstenite::Error),
    /// The inbound stream ended without a close frame.
    StreamEnded,
}

/// Connect to the notification server and deliver room batches until
/// cancelled or the connection fails.
///
/// `push_rooms` is invoked once per `sendRoomNumberList` message with the
/// parsed batch in server order (possibly empty). Returns `Ok(())` when
/// `cancel` fires; in every case the socket and both background tasks are
/// torn down before the call returns.
pub async fn receive_rooms<F>(
    config: FeedConfig,
    cancel: CancellationToken,
    mut push_rooms: F,
) -> Result<(), FeedError>
where
    F: FnMut(Vec<Room>) + Send,
{
    // Open/close observability flag. Written by the lifecycle transitions
    // below, discarded when this call returns.
    let connected = Arc::new(Mutex::new(false));

    let mut request =
        config.endpoint.as_str().into_client_request().map_err(FeedError::Connect)?;
    if let Ok(agent) = USER_AGENT.parse() {
        request.headers_mut().insert("User-Agent", agent);
    }

    let (stream, _response) =
        tokio_tungstenite::connect_async(request).await.map_err(FeedError::Connect)?;
    debug!(endpoint = %config.endpoint, "connected");
    set_connected(&connected, true);

    let (mut ws_tx, ws_rx) = stream.split();

    let feed_cancel = cancel.child_token();
    let (event_tx, mut event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

    let pump = tokio::spawn(receive_pump(
        ws_rx,
        event_tx.clone(),
        feed_cancel.clone(),
        Arc::clone(&connected),
    ));
    let heartbeat = tokio::spawn(heartbeat_loop(
        config.heartbeat_interval,
        event_tx,
        feed_cancel.clone(),
    ));

    let result = run_loop(&config, &mut ws_tx, &mut event_rx, &cancel, &mut push_rooms).await;

    // Teardown, on every exit path: close the socket with "going away",
    // then stop the pump, then the heartbeat, and join both.
    let close = Message::Close(Some(CloseFrame {
        code: CloseCode::Away,
        reason: tungstenite::Utf8Bytes::default(),
    }));
    let _ = ws_tx.send(close).await;
    let _ = ws_tx.close().await;
    feed_cancel.cancel();
    let _ = pump.await;
    let _ = heartbeat.await;
    set_connected(&connected, false);
    debug!("feed torn down");

    result
}

/// The sequential consumer: merges producer events, drives the handshake,
/// and invokes the caller's callback.
async fn run_loop<F>(
    config: &FeedConfig,
    ws_tx: &mut WsTx,
    event_rx: &mut mpsc::Receiver<FeedEvent>,
    cancel: &CancellationToken,
    push_rooms: &mut F,
) -> Result<(), FeedError>
where
    F: FnMut(Vec<Room>) + Send,
{
    loop {
        let event = tokio::select! {
            // Cancellation wins over any queued event.
            biased;
            _ = cancel.cancelled() => return Ok(()),
            event = event_rx.recv() => match event {
                Some(event) => event,
                None => {
                    // Producers also drop their senders when the token
                    // fires; a closed channel during cancellation is not a
                    // peer close.
                    if cancel.is_cancelled() {
                        return Ok(());
                    }
                    return Err(FeedError::ClosedByPeer { code: None, reason: String::new() });
                }
            },
        };

        match event {
            FeedEvent::HeartbeatDue => {
                trace!("heartbeat due");
                let text = message::encode_batch(&[ClientAction::Heartbeat {
                    client: config.client.clone(),
                }]);
                ws_tx.send(Message::Text(text.into())).await.map_err(FeedError::Transport)?;
            }
            FeedEvent::Frame(Message::Text(text)) => match message::decode(&text) {
                ServerEvent::ServerTime => {
                    debug!("server ready, sending handshake batch");
                    let batch = message::handshake_batch(&config.client, config.token.as_ref());
                    let text = message::encode_batch(&batch);
                    ws_tx.send(Message::Text(text.into())).await.map_err(FeedError::Handshake)?;
                }
                ServerEvent::RoomList(entries) => {
                    let rooms: Vec<Room> = entries.iter().map(Room::parse).collect();
                    debug!(count = rooms.len(), "room batch received");
                    push_rooms(rooms);
                }
                ServerEvent::Other => {}
            },
            FeedEvent::Frame(Message::Close(frame)) => {
                debug!(?frame, "server closed the connection");
                return Err(FeedError::ClosedByPeer {
                    code: frame.as_ref().map(|f| u16::from(f.code)),
                    reason: frame.map(|f| f.reason.to_string()).unwrap_or_default(),
                });
            }
            // Binary, ping, and pong frames are ignored.
            FeedEvent::Frame(_) => {}
            FeedEvent::Failed(err) => return Err(FeedError::Transport(err)),
            FeedEvent::StreamEnded => {
                return Err(FeedError::ClosedByPeer { code: None, reason: String::new() })
            }
        }
    }
}

/// Continuously awaits the next inbound frame and forwards it to the
/// consumer. Stops after a read error or stream end, or when cancelled.
async fn receive_pump(
    mut ws_rx: WsRx,
    event_tx: mpsc::Sender<FeedEvent>,
    cancel: CancellationToken,
    connected: Arc<Mutex<bool>>,
) {
    loop {
        let frame = tokio::select! {
            _ = cancel.cancelled() => return,
            frame = ws_rx.next() => frame,
        };
        match frame {
            Some(Ok(msg)) => {
                if matches!(msg, Message::Close(_)) {
                    set_connected(&connected, false);
                }
                if event_tx.send(FeedEvent::Frame(msg)).await.is_err() {
                    return;
                }
            }
            Some(Err(err)) => {
                set_connected(&connected, false);
                let _ = event_tx.send(FeedEvent::Failed(err)).await;
                return;
            }
            None => {
                set_connected(&connected, false);
                let _ = event_tx.send(FeedEvent::StreamEnded).await;
                return;
            }
        }
    }
}

/// Unconditionally requests a heartbeat send every interval, independent of
/// other traffic. Exits silently on cancellation; carries no failure state
/// of its own.
async fn heartbeat_loop(
    interval: Duration,
    event_tx: mpsc::Sender<FeedEvent>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            () = tokio::time::sleep(interval) => {
                if event_tx.send(FeedEvent::HeartbeatDue).await.is_err() {
                    return;
                }
            }
        }
    }
}

fn set_connected(connected: &Mutex<bool>, value: bool) {
    if let Ok(mut guard) = connected.lock() {
        *guard = value;
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
