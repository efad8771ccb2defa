//! Configuration, protocol types, and event/command enums for the realtime client.

use serde::{Deserialize, Serialize};
use standup_config::schema::{RealtimeSettings, SupabaseConfig};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for connecting to Supabase Realtime.
#[derive(Clone)]
pub struct RealtimeConfig {
    /// Project base URL (`https://<ref>.supabase.co` or a local instance).
    pub url: String,
    /// Supabase anon key (publishable).
    pub api_key: String,
    /// Optional user JWT; the anon key is sent when absent.
    pub access_token: Option<String>,
    /// Heartbeat interval in seconds (default: 25).
    pub heartbeat_interval_secs: u64,
    /// Reconnect base delay in seconds.
    pub reconnect_delay_secs: u64,
    /// Maximum reconnect delay in seconds.
    pub max_reconnect_delay_secs: u64,
}

impl std::fmt::Debug for RealtimeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeConfig")
            .field("url", &self.url)
            .field("api_key", &"[REDACTED]")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("heartbeat_interval_secs", &self.heartbeat_interval_secs)
            .field("reconnect_delay_secs", &self.reconnect_delay_secs)
            .field("max_reconnect_delay_secs", &self.max_reconnect_delay_secs)
            .finish()
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            access_token: None,
            heartbeat_interval_secs: 25,
            reconnect_delay_secs: 1,
            max_reconnect_delay_secs: 30,
        }
    }
}

impl RealtimeConfig {
    /// Build from the loaded application config.
    pub fn from_settings(supabase: &SupabaseConfig, settings: &RealtimeSettings) -> Self {
        Self {
            url: supabase.url.clone(),
            api_key: supabase.api_key.clone(),
            access_token: None,
            heartbeat_interval_secs: u64::from(settings.heartbeat_interval),
            reconnect_delay_secs: u64::from(settings.reconnect_delay),
            max_reconnect_delay_secs: u64::from(settings.max_reconnect_delay),
        }
    }

    /// Build the WebSocket URL for Supabase Realtime.
    ///
    /// `https://` maps to `wss://`, `http://` to `ws://`; a bare host is
    /// treated as secure.
    pub(crate) fn ws_url(&self) -> String {
        let base = self.url.trim_end_matches('/');
        let ws_base = if let Some(host) = base.strip_prefix("https://") {
            format!("wss://{host}")
        } else if let Some(host) = base.strip_prefix("http://") {
            format!("ws://{host}")
        } else {
            format!("wss://{base}")
        };
        format!(
            "{ws_base}/realtime/v1/websocket?apikey={}&vsn=1.0.0",
            self.api_key
        )
    }

    /// Token sent with channel joins.
    pub(crate) fn join_token(&self) -> &str {
        self.access_token.as_deref().unwrap_or(&self.api_key)
    }
}

// ---------------------------------------------------------------------------
// Phoenix Protocol Types
// ---------------------------------------------------------------------------

/// A Phoenix protocol message envelope (v1 JSON format).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhoenixMessage {
    pub topic: String,
    pub event: String,
    pub payload: serde_json::Value,
    #[serde(rename = "ref")]
    pub msg_ref: Option<String>,
}

// ---------------------------------------------------------------------------
// Channel Configuration
// ---------------------------------------------------------------------------

/// One `postgres_changes` subscription filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostgresChangeFilter {
    /// `INSERT`, `UPDATE`, `DELETE` or `*`.
    pub event: String,
    pub schema: String,
    pub table: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl PostgresChangeFilter {
    pub fn new(kind: ChangeKind, schema: &str, table: &str) -> Self {
        Self {
            event: kind.as_str().to_string(),
            schema: schema.to_string(),
            table: table.to_string(),
            filter: None,
        }
    }
}

/// Configuration for a Supabase Realtime channel.
#[derive(Debug, Clone, Default)]
pub struct ChannelConfig {
    pub postgres_changes: Vec<PostgresChangeFilter>,
}

impl ChannelConfig {
    /// Serialize to the JSON payload expected by Supabase `phx_join`.
    pub(crate) fn to_join_payload(&self, access_token: &str) -> serde_json::Value {
        serde_json::json!({
            "config": {
                "broadcast": { "self": false, "ack": false },
                "presence": { "key": "" },
                "postgres_changes": self.postgres_changes,
                "private": false
            },
            "access_token": access_token
        })
    }
}

// ---------------------------------------------------------------------------
// Database change payloads
// ---------------------------------------------------------------------------

/// Kind of row change delivered by the change feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Insert => "INSERT",
            ChangeKind::Update => "UPDATE",
            ChangeKind::Delete => "DELETE",
        }
    }
}

/// The `data` object of a `postgres_changes` message.
#[derive(Debug, Clone, Deserialize)]
pub struct PostgresChange {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    pub schema: String,
    pub table: String,
    #[serde(default)]
    pub commit_timestamp: Option<String>,
    /// New row for INSERT/UPDATE.
    #[serde(default)]
    pub record: Option<serde_json::Value>,
    /// Previous row (primary key only by default) for UPDATE/DELETE.
    #[serde(default)]
    pub old_record: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Events & Commands
// ---------------------------------------------------------------------------

/// Events emitted by the realtime client.
#[derive(Debug, Clone)]
pub enum RealtimeEvent {
    /// WebSocket connection established.
    Connected,
    /// WebSocket connection lost.
    Disconnected,
    /// Successfully joined a channel.
    ChannelJoined { topic: String },
    /// Channel closed or errored.
    ChannelError { topic: String, message: String },
    /// A row changed in a subscribed table.
    PostgresChange { topic: String, change: PostgresChange },
    /// Error.
    Error(String),
}

/// Commands sent to the realtime client from the application layer.
#[derive(Debug)]
pub(crate) enum RealtimeCommand {
    JoinChannel {
        topic: String,
        config: ChannelConfig,
    },
    LeaveChannel {
        topic: String,
    },
    Disconnect,
}
