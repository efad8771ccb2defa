use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use standup_room::RemoteError;
use thiserror::Error;

/// Title/description pair, rendered by clients as a toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct Toast {
    pub title: String,
    pub description: String,
}

impl Toast {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum GateError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let (status, toast) = match &self {
            GateError::Validation(message) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Toast::new("Invalid input", message.clone()),
            ),
            GateError::InvalidPassword => (
                StatusCode::UNAUTHORIZED,
                Toast::new("Invalid password", "Please try again."),
            ),
            GateError::Remote(e) => (StatusCode::BAD_GATEWAY, Toast::new("Error", e.message())),
        };

        (status, Json(toast)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        let cases = [
            (GateError::Validation("short".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (GateError::InvalidPassword, StatusCode::UNAUTHORIZED),
            (
                GateError::Remote(RemoteError::Network("down".into())),
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
