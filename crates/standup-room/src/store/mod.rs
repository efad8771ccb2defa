//! Remote row operations against the managed backend.
//!
//! The reconciler and the server only see the [`ParticipantStore`] and
//! [`ConfigStore`] traits; [`PostgrestClient`] is the production
//! implementation over Supabase's REST interface.

mod rest;

use async_trait::async_trait;

use crate::participant::{NewParticipant, Participant, ParticipantId, ParticipantPatch};

pub use rest::PostgrestClient;

/// Failure of a remote call, carrying a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

impl RemoteError {
    /// Message suitable for a notification body.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// The participant collection: `select-all`, `insert`, `update`, `delete`.
#[async_trait]
pub trait ParticipantStore: Send + Sync {
    /// All participants ordered by id ascending.
    async fn select_all(&self) -> Result<Vec<Participant>, RemoteError>;

    /// Insert a row and return it as stored.
    async fn insert(&self, new: &NewParticipant) -> Result<Participant, RemoteError>;

    /// Update one row and return it as stored.
    async fn update(
        &self,
        id: ParticipantId,
        patch: &ParticipantPatch,
    ) -> Result<Participant, RemoteError>;

    /// Delete by id. Deleting a missing id is not an error.
    async fn delete(&self, id: ParticipantId) -> Result<(), RemoteError>;
}

/// Key/value settings shared through the backend.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn config_value(&self, key: &str) -> Result<String, RemoteError>;
}
