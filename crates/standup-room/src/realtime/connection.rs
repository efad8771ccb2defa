//! Background WebSocket connection loop with auto-reconnect.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{Sink, SinkExt, StreamExt};
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, error, info, warn};

use super::handler::handle_phoenix_message;
use super::types::{
    ChannelConfig, PhoenixMessage, RealtimeCommand, RealtimeConfig, RealtimeEvent,
};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

// ---------------------------------------------------------------------------
// Ref Counter
// ---------------------------------------------------------------------------

/// Monotonically increasing ref counter for Phoenix messages.
static REF_COUNTER: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_ref() -> String {
    REF_COUNTER.fetch_add(1, Ordering::Relaxed).to_string()
}

/// A channel that should be (re)joined on reconnect.
#[derive(Clone)]
pub(crate) struct PendingChannel {
    pub(crate) config: ChannelConfig,
    /// Ref of the most recent `phx_join`, matched against `phx_reply`.
    pub(crate) join_ref: Option<String>,
}

pub(crate) type ChannelMap = Arc<RwLock<HashMap<String, PendingChannel>>>;

fn channel_message(topic: &str, event: &str, payload: serde_json::Value) -> PhoenixMessage {
    PhoenixMessage {
        topic: format!("realtime:{topic}"),
        event: event.to_string(),
        payload,
        msg_ref: Some(next_ref()),
    }
}

/// Serialize and write one frame. Returns `false` once the sink is gone.
async fn send_frame<S>(ws_write: &Mutex<S>, msg: &PhoenixMessage) -> bool
where
    S: Sink<WsMessage> + Unpin,
{
    let json = match serde_json::to_string(msg) {
        Ok(json) => json,
        Err(e) => {
            warn!(error = %e, event = %msg.event, "Failed to encode Phoenix message");
            return true;
        }
    };
    let mut writer = ws_write.lock().await;
    writer.send(WsMessage::Text(json.into())).await.is_ok()
}

/// Send `phx_join` for `topic` and remember its ref.
async fn send_join<S>(
    ws_write: &Mutex<S>,
    channels: &ChannelMap,
    topic: String,
    config: ChannelConfig,
    access_token: &str,
) where
    S: Sink<WsMessage> + Unpin,
{
    let msg = channel_message(&topic, "phx_join", config.to_join_payload(access_token));
    let join_ref = msg.msg_ref.clone();
    debug!(topic = %topic, "Joining channel");
    send_frame(ws_write, &msg).await;
    channels
        .write()
        .await
        .insert(topic, PendingChannel { config, join_ref });
}

// ---------------------------------------------------------------------------
// Connection Loop
// ---------------------------------------------------------------------------

/// Background task managing the WebSocket connection with auto-reconnect.
///
/// Exits after a [`RealtimeCommand::Disconnect`] or once every client
/// handle has been dropped.
pub(crate) async fn connection_loop(
    config: RealtimeConfig,
    event_tx: mpsc::Sender<RealtimeEvent>,
    command_rx: mpsc::Receiver<RealtimeCommand>,
) {
    let command_rx = Arc::new(Mutex::new(command_rx));
    let shutdown = Arc::new(AtomicBool::new(false));
    // Channels to rejoin on reconnect.
    let joined_channels: ChannelMap = Arc::new(RwLock::new(HashMap::new()));
    let mut reconnect_delay = config.reconnect_delay_secs;

    loop {
        let url = config.ws_url();
        info!(url = %url.split('?').next().unwrap_or(""), "Connecting to Supabase Realtime");

        match tokio::time::timeout(CONNECT_TIMEOUT, tokio_tungstenite::connect_async(&url)).await
        {
            Ok(Ok((ws_stream, _))) => {
                reconnect_delay = config.reconnect_delay_secs;
                let _ = event_tx.send(RealtimeEvent::Connected).await;

                let (ws_write, mut ws_read) = ws_stream.split();
                let ws_write = Arc::new(Mutex::new(ws_write));

                // Rejoin previously-joined channels with fresh refs.
                let previous: Vec<(String, ChannelConfig)> = joined_channels
                    .read()
                    .await
                    .iter()
                    .map(|(topic, pending)| (topic.clone(), pending.config.clone()))
                    .collect();
                for (topic, channel_config) in previous {
                    send_join(
                        &ws_write,
                        &joined_channels,
                        topic,
                        channel_config,
                        config.join_token(),
                    )
                    .await;
                }

                let heartbeat_handle = tokio::spawn(heartbeat_task(
                    Arc::clone(&ws_write),
                    config.heartbeat_interval_secs,
                ));

                let cmd_handle = tokio::spawn(command_forwarder(
                    Arc::clone(&command_rx),
                    Arc::clone(&ws_write),
                    Arc::clone(&joined_channels),
                    Arc::clone(&shutdown),
                    config.join_token().to_string(),
                ));

                while let Some(msg_result) = ws_read.next().await {
                    match msg_result {
                        Ok(WsMessage::Text(text)) => {
                            match serde_json::from_str::<PhoenixMessage>(&text) {
                                Ok(phoenix_msg) => {
                                    handle_phoenix_message(
                                        &phoenix_msg,
                                        &joined_channels,
                                        &event_tx,
                                    )
                                    .await;
                                }
                                Err(_) => {
                                    debug!(text = %text, "Unrecognized message from Supabase");
                                }
                            }
                        }
                        Ok(WsMessage::Close(_)) => {
                            info!("Supabase Realtime closed connection");
                            break;
                        }
                        Err(e) => {
                            warn!(error = %e, "WebSocket error");
                            break;
                        }
                        _ => {}
                    }
                }

                heartbeat_handle.abort();
                cmd_handle.abort();
                let _ = event_tx.send(RealtimeEvent::Disconnected).await;
            }
            Ok(Err(e)) => {
                error!(error = %e, "Failed to connect to Supabase Realtime");
                let _ = event_tx
                    .send(RealtimeEvent::Error(format!("Connection failed: {e}")))
                    .await;
            }
            Err(_elapsed) => {
                error!("WebSocket connection timed out after 15s");
                let _ = event_tx
                    .send(RealtimeEvent::Error(
                        "Connection timed out after 15s".to_string(),
                    ))
                    .await;
            }
        }

        if shutdown.load(Ordering::Acquire) || event_tx.is_closed() {
            info!("Realtime connection loop stopped");
            return;
        }

        // Exponential backoff reconnect.
        info!(delay = reconnect_delay, "Reconnecting in {reconnect_delay} seconds");
        tokio::time::sleep(Duration::from_secs(reconnect_delay)).await;
        reconnect_delay = (reconnect_delay * 2).min(config.max_reconnect_delay_secs);
    }
}

// ---------------------------------------------------------------------------
// Heartbeat
// ---------------------------------------------------------------------------

async fn heartbeat_task<S>(ws_write: Arc<Mutex<S>>, interval_secs: u64)
where
    S: Sink<WsMessage> + Unpin,
{
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    loop {
        interval.tick().await;
        let msg = PhoenixMessage {
            topic: "phoenix".to_string(),
            event: "heartbeat".to_string(),
            payload: serde_json::json!({}),
            msg_ref: Some(next_ref()),
        };
        if !send_frame(&ws_write, &msg).await {
            break;
        }
    }
}

// ---------------------------------------------------------------------------
// Command Forwarder
// ---------------------------------------------------------------------------

async fn command_forwarder<S>(
    cmd_rx: Arc<Mutex<mpsc::Receiver<RealtimeCommand>>>,
    cmd_write: Arc<Mutex<S>>,
    cmd_channels: ChannelMap,
    shutdown: Arc<AtomicBool>,
    access_token: String,
) where
    S: Sink<WsMessage> + Unpin,
{
    let mut rx = cmd_rx.lock().await;
    loop {
        let Some(cmd) = rx.recv().await else {
            // Every client handle is gone.
            shutdown.store(true, Ordering::Release);
            let mut writer = cmd_write.lock().await;
            let _ = writer.send(WsMessage::Close(None)).await;
            return;
        };
        match cmd {
            RealtimeCommand::JoinChannel { topic, config } => {
                send_join(&cmd_write, &cmd_channels, topic, config, &access_token).await;
            }
            RealtimeCommand::LeaveChannel { topic } => {
                let msg = channel_message(&topic, "phx_leave", serde_json::json!({}));
                send_frame(&cmd_write, &msg).await;
                cmd_channels.write().await.remove(&topic);
                debug!(topic = %topic, "Left channel");
            }
            RealtimeCommand::Disconnect => {
                shutdown.store(true, Ordering::Release);
                let topics: Vec<String> = cmd_channels.write().await.drain().map(|(t, _)| t).collect();
                for topic in topics {
                    let msg = channel_message(&topic, "phx_leave", serde_json::json!({}));
                    send_frame(&cmd_write, &msg).await;
                }
                let mut writer = cmd_write.lock().await;
                let _ = writer.send(WsMessage::Close(None)).await;
                return;
            }
        }
    }
}
