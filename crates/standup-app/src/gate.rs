//! Client side of the password gate.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use standup_common::Notification;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ToastBody {
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, thiserror::Error)]
pub enum UnlockError {
    #[error("{title}: {description}")]
    Rejected { title: String, description: String },

    #[error("Could not reach the standup server: {0}")]
    Network(String),

    #[error("Unexpected response from the standup server: HTTP {0}")]
    Unexpected(u16),
}

/// Strips surrounding whitespace, whichever way the password was given.
pub fn normalize_password(raw: &str) -> String {
    raw.trim().to_string()
}

/// Password given up front, the flag winning over the environment.
/// Blank values count as absent so the prompt still runs.
pub fn preset_password(flag: Option<String>, env: Option<String>) -> Option<String> {
    flag.or(env)
        .map(|raw| normalize_password(&raw))
        .filter(|password| !password.is_empty())
}

/// Submit the meeting password. The returned notification is the server's
/// success message.
pub async fn unlock(base_url: &str, password: &str) -> Result<Notification, UnlockError> {
    let http = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .map_err(|e| UnlockError::Network(e.to_string()))?;

    let url = format!("{}/enter-password", base_url.trim_end_matches('/'));
    debug!(url = %url, "Submitting meeting password");
    let resp = http
        .post(&url)
        .json(&serde_json::json!({ "password": password }))
        .send()
        .await
        .map_err(|e| UnlockError::Network(e.to_string()))?;

    let status = resp.status();
    match status {
        StatusCode::OK => {
            let body: ToastBody = resp
                .json()
                .await
                .map_err(|e| UnlockError::Network(e.to_string()))?;
            Ok(Notification::info(body.title, body.description))
        }
        StatusCode::UNAUTHORIZED | StatusCode::UNPROCESSABLE_ENTITY => {
            let body: ToastBody = resp
                .json()
                .await
                .map_err(|_| UnlockError::Unexpected(status.as_u16()))?;
            Err(UnlockError::Rejected {
                title: body.title,
                description: body.description,
            })
        }
        _ => Err(UnlockError::Unexpected(status.as_u16())),
    }
}
