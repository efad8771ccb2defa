//! [`ChangeFeed`] backed by Supabase Realtime `postgres_changes`.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::translator::change_translator;
use super::{ChangeFeed, Subscription};
use crate::realtime::{
    ChangeKind, ChannelConfig, PostgresChangeFilter, RealtimeClient, RealtimeConfig,
    RealtimeEvent,
};
use crate::store::RemoteError;

const SUBSCRIBE_TIMEOUT: Duration = Duration::from_secs(15);

/// Opens one realtime connection per subscription.
#[derive(Debug, Clone)]
pub struct RealtimeFeed {
    config: RealtimeConfig,
    schema: String,
}

impl RealtimeFeed {
    pub fn new(config: RealtimeConfig, schema: impl Into<String>) -> Self {
        Self {
            config,
            schema: schema.into(),
        }
    }

    fn channel_config(&self, table: &str) -> ChannelConfig {
        ChannelConfig {
            postgres_changes: [ChangeKind::Insert, ChangeKind::Delete, ChangeKind::Update]
                .into_iter()
                .map(|kind| PostgresChangeFilter::new(kind, &self.schema, table))
                .collect(),
        }
    }
}

/// Wait for the join acknowledgment of `topic`.
async fn await_join(
    rt_rx: &mut mpsc::Receiver<RealtimeEvent>,
    topic: &str,
) -> Result<(), RemoteError> {
    while let Some(event) = rt_rx.recv().await {
        match event {
            RealtimeEvent::ChannelJoined { topic: joined } if joined == topic => return Ok(()),
            RealtimeEvent::ChannelError { topic: failed, message } if failed == topic => {
                return Err(RemoteError::Network(format!(
                    "subscription to {topic} failed: {message}"
                )));
            }
            RealtimeEvent::Error(e) => warn!(error = %e, "Realtime error while subscribing"),
            _ => {}
        }
    }
    Err(RemoteError::Network("realtime connection ended".to_string()))
}

#[async_trait]
impl ChangeFeed for RealtimeFeed {
    async fn subscribe(&self, table: &str) -> Result<Subscription, RemoteError> {
        let (client, mut rt_rx) = RealtimeClient::connect(self.config.clone());
        let topic = table.to_string();
        client.join_channel(&topic, self.channel_config(table)).await;

        let joined = tokio::time::timeout(SUBSCRIBE_TIMEOUT, await_join(&mut rt_rx, &topic))
            .await
            .unwrap_or_else(|_| {
                Err(RemoteError::Network(format!(
                    "subscription to {topic} timed out"
                )))
            });
        if let Err(e) = joined {
            client.disconnect().await;
            return Err(e);
        }
        info!(topic = %topic, "Subscribed to participant changes");

        let (change_tx, change_rx) = mpsc::channel(256);
        tokio::spawn(change_translator(rt_rx, change_tx, table.to_string()));
        Ok(Subscription::new(topic, change_rx, client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_config_covers_all_change_kinds() {
        let feed = RealtimeFeed::new(RealtimeConfig::default(), "public");
        let config = feed.channel_config("people");
        let events: Vec<_> = config
            .postgres_changes
            .iter()
            .map(|f| f.event.as_str())
            .collect();
        assert_eq!(events, vec!["INSERT", "DELETE", "UPDATE"]);
        assert!(config
            .postgres_changes
            .iter()
            .all(|f| f.schema == "public" && f.table == "people"));
    }

    #[tokio::test]
    async fn join_error_fails_subscription() {
        let (tx, mut rx) = mpsc::channel(4);
        tx.send(RealtimeEvent::Connected).await.unwrap();
        tx.send(RealtimeEvent::ChannelError {
            topic: "people".into(),
            message: "unauthorized".into(),
        })
        .await
        .unwrap();
        let err = await_join(&mut rx, "people").await.unwrap_err();
        assert!(err.to_string().contains("unauthorized"));
    }

    #[tokio::test]
    async fn join_ack_for_topic_succeeds() {
        let (tx, mut rx) = mpsc::channel(4);
        tx.send(RealtimeEvent::ChannelJoined { topic: "other".into() }).await.unwrap();
        tx.send(RealtimeEvent::ChannelJoined { topic: "people".into() }).await.unwrap();
        assert!(await_join(&mut rx, "people").await.is_ok());
    }
}
