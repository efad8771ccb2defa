//! The Presence Reconciler.
//!
//! Keeps the local participant list and the "self" record consistent with
//! the backend: an initial fetch, then change events applied one at a time
//! through the pure [`apply`] reducer. User actions (toggles, rename, leave)
//! go through the same owner, so state is never touched concurrently.

mod reducer;
mod room;


pub use reducer::apply;
pub use room::Reconciler;

use crate::store::RemoteError;

/// Lifecycle of a [`Reconciler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    /// Self insert and initial fetch attempted.
    Joined,
    /// Subscription open and buffered changes applied.
    Subscribed,
    Left,
}

/// Failure to bring a room up.
#[derive(Debug, thiserror::Error)]
pub enum JoinError {
    #[error("room already initialized")]
    AlreadyInitialized,
    #[error("could not subscribe to participant changes: {0}")]
    Subscribe(#[from] RemoteError),
}

/// Notification titles shown for remote failures.
pub mod titles {
    pub const JOIN_FAILED: &str = "Error while joining daily room";
    pub const FETCH_FAILED: &str = "Error";
    pub const TOGGLE_TALKED_FAILED: &str = "Error: Could not toggle has_talked";
    pub const TOGGLE_ISSUE_FAILED: &str = "Error: Could not toggle has_issue";
    pub const RENAME_FAILED: &str = "Error: Could not update name";
}
