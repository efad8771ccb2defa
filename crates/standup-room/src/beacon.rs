//! Best-effort leave signal.
//!
//! The request is spawned and never awaited by the caller: no
//! acknowledgment, no retry, failures are only logged.

use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::participant::ParticipantId;
use crate::store::RemoteError;

/// Fire-and-forget notification that a participant is leaving.
pub trait LeaveNotifier: Send + Sync {
    fn notify_leave(&self, id: ParticipantId);
}

/// Posts `/api/leave/{id}` to the standup server.
pub struct LeaveBeacon {
    http: reqwest::Client,
    base_url: String,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl std::fmt::Debug for LeaveBeacon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeaveBeacon")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl LeaveBeacon {
    pub fn new(base_url: &str) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| RemoteError::Network(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            pending: Mutex::new(Vec::new()),
        })
    }

    pub fn leave_url(&self, id: ParticipantId) -> String {
        format!("{}/api/leave/{id}", self.base_url)
    }

    /// Give in-flight signals up to `grace` to finish. Never fails.
    pub async fn settle(&self, grace: Duration) {
        let handles: Vec<JoinHandle<()>> = match self.pending.lock() {
            Ok(mut pending) => pending.drain(..).collect(),
            Err(poisoned) => poisoned.into_inner().drain(..).collect(),
        };
        if handles.is_empty() {
            return;
        }
        let all = futures_util::future::join_all(handles);
        if tokio::time::timeout(grace, all).await.is_err() {
            debug!(?grace, "Leave signal still in flight at exit");
        }
    }
}

impl LeaveNotifier for LeaveBeacon {
    fn notify_leave(&self, id: ParticipantId) {
        let request = self.http.post(self.leave_url(id));
        let handle = tokio::spawn(async move {
            match request.send().await {
                Ok(resp) => debug!(%id, status = %resp.status(), "Leave signal sent"),
                Err(e) => debug!(%id, error = %e, "Leave signal failed"),
            }
        });
        match self.pending.lock() {
            Ok(mut pending) => {
                pending.retain(|h| !h.is_finished());
                pending.push(handle);
            }
            Err(poisoned) => poisoned.into_inner().push(handle),
        }
    }
}
