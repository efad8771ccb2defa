//! Translates realtime database changes into [`ParticipantChange`]s.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::ParticipantChange;
use crate::participant::{Participant, ParticipantId};
use crate::realtime::{ChangeKind, PostgresChange, RealtimeEvent};

#[derive(serde::Deserialize)]
struct RowKey {
    id: ParticipantId,
}

/// Decode a `postgres_changes` payload for the participants table.
pub fn participant_change(change: &PostgresChange) -> Result<ParticipantChange, String> {
    match change.kind {
        ChangeKind::Insert | ChangeKind::Update => {
            let record = change
                .record
                .clone()
                .ok_or_else(|| format!("{} without record", change.kind.as_str()))?;
            let participant: Participant =
                serde_json::from_value(record).map_err(|e| e.to_string())?;
            Ok(if change.kind == ChangeKind::Insert {
                ParticipantChange::Created(participant)
            } else {
                ParticipantChange::Updated(participant)
            })
        }
        ChangeKind::Delete => {
            let old = change
                .old_record
                .clone()
                .ok_or_else(|| "DELETE without old_record".to_string())?;
            let key: RowKey = serde_json::from_value(old).map_err(|e| e.to_string())?;
            Ok(ParticipantChange::Deleted(key.id))
        }
    }
}

// ---------------------------------------------------------------------------
// Event Translator
// ---------------------------------------------------------------------------

/// Background task that forwards participant changes on `table`.
///
/// Ends when the realtime client stops or the subscriber goes away.
pub(crate) async fn change_translator(
    mut rt_rx: mpsc::Receiver<RealtimeEvent>,
    change_tx: mpsc::Sender<ParticipantChange>,
    table: String,
) {
    while let Some(rt_event) = rt_rx.recv().await {
        match rt_event {
            RealtimeEvent::PostgresChange { change, .. } => {
                if change.table != table {
                    debug!(table = %change.table, "Ignoring change on other table");
                    continue;
                }
                match participant_change(&change) {
                    Ok(participant_change) => {
                        if change_tx.send(participant_change).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!(error = %e, "Dropping undecodable participant change"),
                }
            }
            RealtimeEvent::Connected => info!("Realtime connected"),
            RealtimeEvent::Disconnected => info!("Realtime disconnected"),
            RealtimeEvent::ChannelJoined { topic } => debug!(topic = %topic, "Channel rejoined"),
            RealtimeEvent::ChannelError { topic, message } => {
                warn!(topic = %topic, message = %message, "Realtime channel error");
            }
            RealtimeEvent::Error(e) => warn!(error = %e, "Realtime error"),
        }
    }
    debug!("Change translator stopped");
}
