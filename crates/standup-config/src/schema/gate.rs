use serde::{Deserialize, Serialize};

/// Password gate settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Name of the cookie that marks a session as authenticated.
    pub cookie_name: String,
    /// Key of the row in the config table holding the password.
    pub password_key: String,
    pub min_password_length: u32,
    pub max_password_length: u32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            cookie_name: "is_authenticated".into(),
            password_key: "password".into(),
            min_password_length: 8,
            max_password_length: 100,
        }
    }
}
