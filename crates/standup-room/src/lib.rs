//! Room plumbing for the standup helper: participant model, Supabase
//! REST store and Realtime client, the change feed, the leave beacon, and
//! the Presence Reconciler that ties them together.

pub mod beacon;
pub mod feed;
pub mod participant;
pub mod realtime;
pub mod reconciler;
pub mod store;

pub use beacon::{LeaveBeacon, LeaveNotifier};
pub use feed::{ChangeFeed, ParticipantChange, RealtimeFeed, Subscription};
pub use participant::{
    placeholder_name, validate_name, NameError, NewParticipant, Participant, ParticipantId,
    ParticipantPatch,
};
pub use reconciler::{apply, JoinError, Phase, Reconciler};
pub use store::{ConfigStore, ParticipantStore, PostgrestClient, RemoteError};
