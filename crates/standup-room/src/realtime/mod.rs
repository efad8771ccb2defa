//! Thin Supabase Realtime client over Phoenix Channels v1 protocol.
//!
//! Handles heartbeats, channel join/leave, `postgres_changes`
//! subscriptions and auto-reconnect with backoff. The transport runs in
//! background tasks; callers talk to it through [`RealtimeClient`] and read
//! [`RealtimeEvent`]s from a channel.

mod client;
mod connection;
mod handler;
mod types;

pub use client::RealtimeClient;
pub use types::{
    ChangeKind, ChannelConfig, PhoenixMessage, PostgresChange, PostgresChangeFilter,
    RealtimeConfig, RealtimeEvent,
};
