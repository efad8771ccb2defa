use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::json;
use standup_room::ParticipantId;
use tracing::{debug, info, warn};

use crate::{
    error::{GateError, Toast},
    gate::{auth_cookie, is_authenticated, password_matches, validate_password},
    state::AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct PasswordForm {
    #[serde(default)]
    password: Option<String>,
}

/// `POST /api/leave/{participant_id}`. Always answers `Done!`.
pub async fn leave_handler(
    State(state): State<Arc<AppState>>,
    Path(participant_id): Path<String>,
) -> impl IntoResponse {
    info!("deleting participant {participant_id}");

    match participant_id.parse::<ParticipantId>() {
        Ok(id) => {
            if let Err(e) = state.participants.delete(id).await {
                warn!(%id, error = %e, "Leave delete failed");
            }
        }
        Err(e) => warn!(participant_id = %participant_id, error = %e, "Unparsable participant id"),
    }

    Json(json!({ "message": "Done!" }))
}

/// `GET /enter-password`.
pub async fn password_prompt_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    if is_authenticated(&headers, &state.gate.cookie_name) {
        return Redirect::to("/").into_response();
    }
    Json(Toast::new(
        "Meeting Password",
        "You can get the password from the meeting host.",
    ))
    .into_response()
}

/// `POST /enter-password`.
///
/// The body is only decoded once the cookie check has passed, so an
/// authenticated client is redirected whatever it sends.
pub async fn password_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, GateError> {
    if is_authenticated(&headers, &state.gate.cookie_name) {
        return Ok(Redirect::to("/").into_response());
    }

    let form: PasswordForm = match serde_json::from_slice(&body) {
        Ok(form) => form,
        Err(e) => {
            debug!(error = %e, "Unreadable password form");
            PasswordForm::default()
        }
    };

    validate_password(form.password.as_deref(), &state.gate)?;
    let submitted = form.password.unwrap_or_default();

    let actual = match state.config_store.config_value(&state.gate.password_key).await {
        Ok(actual) => actual,
        Err(e) => {
            warn!(error = %e, "Password lookup failed");
            return Err(GateError::InvalidPassword);
        }
    };

    if !password_matches(&submitted, &actual) {
        debug!("Password mismatch");
        return Err(GateError::InvalidPassword);
    }

    info!("Gate unlocked");
    Ok((
        StatusCode::OK,
        [(SET_COOKIE, auth_cookie(&state.gate.cookie_name))],
        Json(Toast::new(
            "Success",
            "You have successfully joined the meeting.",
        )),
    )
        .into_response())
}

/// `GET /`: the room snapshot, behind the gate.
pub async fn room_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, GateError> {
    if !is_authenticated(&headers, &state.gate.cookie_name) {
        return Ok(Redirect::temporary("/enter-password").into_response());
    }
    let participants = state.participants.select_all().await?;
    Ok(Json(participants).into_response())
}

/// `GET /exited`.
pub async fn exited_handler() -> impl IntoResponse {
    Json(json!({
        "message": "You left the meeting.",
        "description": "See ya next time!"
    }))
}
