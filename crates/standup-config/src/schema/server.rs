//! HTTP service configuration (leave endpoint and password gate).

use serde::{Deserialize, Serialize};

/// Where the HTTP service listens and how clients reach it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Base URL clients use for the leave beacon and the gate.
    pub public_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 3000,
            public_url: "http://localhost:3000".into(),
        }
    }
}

impl ServerConfig {
    /// Socket address string for the listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
