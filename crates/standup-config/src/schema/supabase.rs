//! Managed backend connection settings.

use serde::{Deserialize, Serialize};

/// Connection details for the hosted Supabase project.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupabaseConfig {
    /// Project base URL, e.g. `https://abcd.supabase.co` or `http://localhost:54321`.
    pub url: String,
    /// Anon (publishable) key, sent as `apikey` and bearer token.
    pub api_key: String,
    /// Database schema holding the tables.
    pub schema: String,
    /// Table of room participants.
    pub participants_table: String,
    /// Key/value table holding shared settings such as the gate password.
    pub config_table: String,
    /// HTTP request timeout in seconds.
    pub request_timeout: u32,
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("api_key", &"[REDACTED]")
            .field("schema", &self.schema)
            .field("participants_table", &self.participants_table)
            .field("config_table", &self.config_table)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            schema: "public".into(),
            participants_table: "people".into(),
            config_table: "config".into(),
            request_timeout: 30,
        }
    }
}
