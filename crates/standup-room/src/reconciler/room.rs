//! Stateful reconciler owned by the view task.

use standup_common::{Notification, NotificationQueue};
use standup_config::schema::RoomConfig;
use tracing::{debug, info, warn};

use super::{apply, titles, JoinError, Phase};
use crate::beacon::LeaveNotifier;
use crate::feed::{ChangeFeed, ParticipantChange, Subscription};
use crate::participant::{
    placeholder_name, validate_name, NameError, NewParticipant, Participant, ParticipantPatch,
};
use crate::store::{ParticipantStore, RemoteError};

/// Which boolean flag a toggle flips.
#[derive(Debug, Clone, Copy)]
enum Flag {
    Talked,
    Issue,
}

pub struct Reconciler<S> {
    store: S,
    table: String,
    placeholder_prefix: String,
    participants: Vec<Participant>,
    self_participant: Option<Participant>,
    notifications: NotificationQueue,
    phase: Phase,
}

impl<S: ParticipantStore> Reconciler<S> {
    pub fn new(store: S, table: impl Into<String>, room: &RoomConfig) -> Self {
        Self {
            store,
            table: table.into(),
            placeholder_prefix: room.placeholder_prefix.clone(),
            participants: Vec::new(),
            self_participant: None,
            notifications: NotificationQueue::new(room.notification_capacity as usize),
            phase: Phase::Uninitialized,
        }
    }

    // -- accessors ----------------------------------------------------------

    /// Participants in display order.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn self_participant(&self) -> Option<&Participant> {
        self.self_participant.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn notifications(&mut self) -> &mut NotificationQueue {
        &mut self.notifications
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // -- lifecycle ----------------------------------------------------------

    /// Join the room: subscribe, insert self, fetch everyone, then apply
    /// whatever changes arrived in the meantime.
    ///
    /// Insert and fetch failures become notifications; only a failed
    /// subscription is returned as an error.
    pub async fn initialize(&mut self, feed: &dyn ChangeFeed) -> Result<Subscription, JoinError> {
        if self.phase != Phase::Uninitialized {
            return Err(JoinError::AlreadyInitialized);
        }

        let mut subscription = feed.subscribe(&self.table).await?;

        let new = NewParticipant {
            name: placeholder_name(&self.placeholder_prefix),
        };
        match self.store.insert(&new).await {
            Ok(me) => {
                info!(id = %me.id, name = %me.name, "Joined room");
                self.self_participant = Some(me);
            }
            Err(e) => {
                warn!(error = %e, "Could not add self to room");
                self.notify_error(titles::JOIN_FAILED, &e);
            }
        }

        match self.store.select_all().await {
            Ok(list) => {
                debug!(count = list.len(), "Fetched participants");
                self.participants = list;
            }
            Err(e) => {
                warn!(error = %e, "Could not fetch participants");
                self.notify_error(titles::FETCH_FAILED, &e);
            }
        }
        self.phase = Phase::Joined;

        let mut buffered = 0usize;
        while let Some(change) = subscription.try_next() {
            self.apply_change(change);
            buffered += 1;
        }
        if buffered > 0 {
            debug!(buffered, "Applied changes received during join");
        }

        self.phase = Phase::Subscribed;
        Ok(subscription)
    }

    /// Apply one change event from the subscription.
    pub fn apply_change(&mut self, change: ParticipantChange) {
        if self.phase == Phase::Left {
            return;
        }
        let list = std::mem::take(&mut self.participants);
        self.participants = apply(list, &change);

        let concerns_self = self
            .self_participant
            .as_ref()
            .is_some_and(|me| me.id == change.id());
        if !concerns_self {
            return;
        }
        match change {
            ParticipantChange::Updated(p) => self.self_participant = Some(p),
            ParticipantChange::Deleted(id) => {
                warn!(%id, "Self was removed from the room");
                self.self_participant = None;
            }
            ParticipantChange::Created(_) => {}
        }
    }

    /// Close the subscription and stop applying changes.
    pub async fn teardown(&mut self, subscription: Subscription) {
        subscription.close().await;
        self.phase = Phase::Left;
        info!("Left room");
    }

    // -- user actions -------------------------------------------------------

    pub async fn toggle_self_talked(&mut self) {
        self.toggle(Flag::Talked).await;
    }

    pub async fn toggle_self_issue(&mut self) {
        self.toggle(Flag::Issue).await;
    }

    async fn toggle(&mut self, flag: Flag) {
        let Some(me) = &self.self_participant else {
            debug!(?flag, "Toggle ignored: not in room");
            return;
        };
        let (patch, title) = match flag {
            Flag::Talked => (ParticipantPatch::has_talked(!me.has_talked), titles::TOGGLE_TALKED_FAILED),
            Flag::Issue => (ParticipantPatch::has_issue(!me.has_issue), titles::TOGGLE_ISSUE_FAILED),
        };
        let id = me.id;
        match self.store.update(id, &patch).await {
            Ok(updated) => self.replace_self(updated),
            Err(e) => {
                warn!(%id, ?flag, error = %e, "Toggle failed");
                self.notify_error(title, &e);
            }
        }
    }

    /// Rename self. Invalid names are returned without contacting the
    /// backend; remote failures become a notification and still return
    /// `Ok(())` so the caller can close its prompt.
    pub async fn rename_self(&mut self, name: &str) -> Result<(), NameError> {
        validate_name(name)?;
        let Some(me) = &self.self_participant else {
            debug!("Rename ignored: not in room");
            return Ok(());
        };
        let id = me.id;
        match self.store.update(id, &ParticipantPatch::name(name)).await {
            Ok(updated) => self.replace_self(updated),
            Err(e) => {
                warn!(%id, error = %e, "Rename failed");
                self.notify_error(titles::RENAME_FAILED, &e);
            }
        }
        Ok(())
    }

    /// Signal departure without waiting for an answer.
    pub fn leave(&self, notifier: &dyn LeaveNotifier) {
        if let Some(me) = &self.self_participant {
            info!(id = %me.id, "Sending leave signal");
            notifier.notify_leave(me.id);
        }
    }

    // -- helpers ------------------------------------------------------------

    fn replace_self(&mut self, updated: Participant) {
        let list = std::mem::take(&mut self.participants);
        self.participants = apply(list, &ParticipantChange::Updated(updated.clone()));
        self.self_participant = Some(updated);
    }

    fn notify_error(&mut self, title: &str, err: &RemoteError) {
        self.notifications
            .push(Notification::error(title, err.message()));
    }
}
