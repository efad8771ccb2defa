//! Incoming Phoenix message handling and `postgres_changes` parsing.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::connection::ChannelMap;
use super::types::{PhoenixMessage, PostgresChange, RealtimeEvent};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Extract the short topic name from a Phoenix topic (strip "realtime:" prefix).
fn strip_topic_prefix(topic: &str) -> &str {
    topic.strip_prefix("realtime:").unwrap_or(topic)
}

fn reply_reason(payload: &serde_json::Value) -> String {
    let response = payload.get("response");
    response
        .and_then(|r| r.get("reason"))
        .or_else(|| response.and_then(|r| r.get("message")))
        .and_then(|r| r.as_str())
        .unwrap_or("unknown error")
        .to_string()
}

// ---------------------------------------------------------------------------
// Translation
// ---------------------------------------------------------------------------

/// Map one Phoenix message onto a client event.
///
/// `join_ref` is the ref of the outstanding `phx_join` for the message's
/// topic; only the reply carrying it counts as a join acknowledgment.
pub(crate) fn translate(msg: &PhoenixMessage, join_ref: Option<&str>) -> Option<RealtimeEvent> {
    let topic = strip_topic_prefix(&msg.topic);

    match msg.event.as_str() {
        "phx_reply" => {
            if msg.topic == "phoenix" {
                return None; // heartbeat ack
            }
            let status = msg.payload.get("status").and_then(|s| s.as_str())?;
            let is_join_reply = join_ref.is_some() && msg.msg_ref.as_deref() == join_ref;
            if status == "ok" {
                if !is_join_reply {
                    return None;
                }
                debug!(topic = %topic, "Channel join acknowledged");
                Some(RealtimeEvent::ChannelJoined {
                    topic: topic.to_string(),
                })
            } else {
                let message = reply_reason(&msg.payload);
                warn!(topic = %topic, status = %status, message = %message, "Channel reply error");
                Some(RealtimeEvent::ChannelError {
                    topic: topic.to_string(),
                    message,
                })
            }
        }
        "phx_error" => {
            warn!(topic = %topic, "Channel error");
            Some(RealtimeEvent::ChannelError {
                topic: topic.to_string(),
                message: "Channel error".to_string(),
            })
        }
        "phx_close" => {
            info!(topic = %topic, "Channel closed");
            Some(RealtimeEvent::ChannelError {
                topic: topic.to_string(),
                message: "Channel closed".to_string(),
            })
        }
        "system" => {
            // Subscription status reports, e.g. postgres_changes readiness.
            let status = msg.payload.get("status").and_then(|s| s.as_str());
            let message = msg
                .payload
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or_default();
            if status == Some("error") {
                warn!(topic = %topic, message = %message, "Realtime system error");
                Some(RealtimeEvent::ChannelError {
                    topic: topic.to_string(),
                    message: message.to_string(),
                })
            } else {
                debug!(topic = %topic, message = %message, "Realtime system message");
                None
            }
        }
        "postgres_changes" => {
            let data = msg.payload.get("data")?;
            match serde_json::from_value::<PostgresChange>(data.clone()) {
                Ok(change) => {
                    debug!(
                        topic = %topic,
                        kind = change.kind.as_str(),
                        table = %change.table,
                        "Database change received"
                    );
                    Some(RealtimeEvent::PostgresChange {
                        topic: topic.to_string(),
                        change,
                    })
                }
                Err(e) => {
                    warn!(topic = %topic, error = %e, "Malformed postgres_changes payload");
                    None
                }
            }
        }
        _ => {
            debug!(topic = %topic, event = %msg.event, "Unhandled Phoenix event");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Message Handler
// ---------------------------------------------------------------------------

/// Handle a single incoming Phoenix message.
pub(crate) async fn handle_phoenix_message(
    msg: &PhoenixMessage,
    joined_channels: &ChannelMap,
    event_tx: &mpsc::Sender<RealtimeEvent>,
) {
    let join_ref = joined_channels
        .read()
        .await
        .get(strip_topic_prefix(&msg.topic))
        .and_then(|pending| pending.join_ref.clone());

    if let Some(event) = translate(msg, join_ref.as_deref()) {
        let _ = event_tx.send(event).await;
    }
}
