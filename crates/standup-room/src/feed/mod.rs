//! Change feed for the participants table.
//!
//! A [`ChangeFeed`] opens a [`Subscription`] that yields one
//! [`ParticipantChange`] per created, updated or deleted row. The
//! production feed is [`RealtimeFeed`]; tests drive a [`Subscription`]
//! directly through [`Subscription::detached`].

mod realtime;
mod translator;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use crate::participant::{Participant, ParticipantId};
use crate::realtime::RealtimeClient;
use crate::store::RemoteError;

pub use realtime::RealtimeFeed;
pub use translator::participant_change;

/// One change to the participants collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParticipantChange {
    Created(Participant),
    Updated(Participant),
    Deleted(ParticipantId),
}

impl ParticipantChange {
    /// Id of the row the change concerns.
    pub fn id(&self) -> ParticipantId {
        match self {
            ParticipantChange::Created(p) | ParticipantChange::Updated(p) => p.id,
            ParticipantChange::Deleted(id) => *id,
        }
    }
}

/// Source of participant change subscriptions.
#[async_trait]
pub trait ChangeFeed: Send + Sync {
    /// Subscribe to created/updated/deleted events on `table`.
    ///
    /// Returns once the backend has acknowledged the subscription.
    async fn subscribe(&self, table: &str) -> Result<Subscription, RemoteError>;
}

/// A live subscription. Closing consumes the handle, so it happens once.
pub struct Subscription {
    topic: String,
    rx: mpsc::Receiver<ParticipantChange>,
    client: Option<RealtimeClient>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("topic", &self.topic)
            .field("connected", &self.client.is_some())
            .finish()
    }
}

impl Subscription {
    pub(crate) fn new(
        topic: String,
        rx: mpsc::Receiver<ParticipantChange>,
        client: RealtimeClient,
    ) -> Self {
        Self {
            topic,
            rx,
            client: Some(client),
        }
    }

    /// A subscription fed by an arbitrary channel, with no transport behind it.
    pub fn detached(topic: impl Into<String>, rx: mpsc::Receiver<ParticipantChange>) -> Self {
        Self {
            topic: topic.into(),
            rx,
            client: None,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Next change, or `None` once the feed has ended.
    pub async fn next(&mut self) -> Option<ParticipantChange> {
        self.rx.recv().await
    }

    /// Next change if one is already buffered.
    pub fn try_next(&mut self) -> Option<ParticipantChange> {
        self.rx.try_recv().ok()
    }

    /// Leave the channel and drop the connection.
    pub async fn close(mut self) {
        self.rx.close();
        if let Some(client) = self.client.take() {
            client.leave_channel(&self.topic).await;
            client.disconnect().await;
        }
        debug!(topic = %self.topic, "Subscription closed");
    }
}
