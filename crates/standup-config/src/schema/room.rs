//! Room (client view) behaviour.

use serde::{Deserialize, Serialize};

/// Client-side room settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Prefix of the generated placeholder name given on join.
    pub placeholder_prefix: String,
    /// How long pending leave beacons may run before the process exits (ms).
    pub leave_grace_ms: u32,
    /// Maximum number of queued notifications.
    pub notification_capacity: u32,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            placeholder_prefix: "John Doe".into(),
            leave_grace_ms: 500,
            notification_capacity: 8,
        }
    }
}
