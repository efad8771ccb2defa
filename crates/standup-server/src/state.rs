use std::sync::Arc;

use standup_config::schema::GateConfig;
use standup_room::{ConfigStore, ParticipantStore};

/// Shared handler state.
pub struct AppState {
    pub participants: Arc<dyn ParticipantStore>,
    pub config_store: Arc<dyn ConfigStore>,
    pub gate: GateConfig,
}

impl AppState {
    pub fn new(
        participants: Arc<dyn ParticipantStore>,
        config_store: Arc<dyn ConfigStore>,
        gate: GateConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            participants,
            config_store,
            gate,
        })
    }
}
