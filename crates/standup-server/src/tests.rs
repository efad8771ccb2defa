use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::{StatusCode, header};
use standup_config::schema::GateConfig;
use standup_room::{
    ConfigStore, NewParticipant, Participant, ParticipantId, ParticipantPatch, ParticipantStore,
    RemoteError,
};
use tokio::net::TcpListener;

use super::router;
use crate::{error::Toast, state::AppState};

#[derive(Default)]
struct FakeBackend {
    rows: Mutex<Vec<Participant>>,
    deleted: Mutex<Vec<ParticipantId>>,
    password: Option<String>,
    fail_delete: bool,
}

#[async_trait]
impl ParticipantStore for FakeBackend {
    async fn select_all(&self) -> Result<Vec<Participant>, RemoteError> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn insert(&self, _new: &NewParticipant) -> Result<Participant, RemoteError> {
        Err(RemoteError::Network("not used".into()))
    }

    async fn update(
        &self,
        _id: ParticipantId,
        _patch: &ParticipantPatch,
    ) -> Result<Participant, RemoteError> {
        Err(RemoteError::Network("not used".into()))
    }

    async fn delete(&self, id: ParticipantId) -> Result<(), RemoteError> {
        self.deleted.lock().unwrap().push(id);
        if self.fail_delete {
            return Err(RemoteError::Network("connection reset".into()));
        }
        self.rows.lock().unwrap().retain(|p| p.id != id);
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for FakeBackend {
    async fn config_value(&self, key: &str) -> Result<String, RemoteError> {
        assert_eq!(key, "password");
        self.password.clone().ok_or(RemoteError::Api {
            status: 406,
            message: "JSON object requested, multiple (or no) rows returned".into(),
        })
    }
}

fn backend(password: Option<&str>) -> Arc<FakeBackend> {
    Arc::new(FakeBackend {
        rows: Mutex::new(vec![
            Participant {
                id: ParticipantId(1),
                name: "Ada".into(),
                has_talked: true,
                has_issue: false,
            },
            Participant {
                id: ParticipantId(2),
                name: "Grace".into(),
                has_talked: false,
                has_issue: true,
            },
        ]),
        password: password.map(Into::into),
        ..Default::default()
    })
}

/// Serve the router on an ephemeral port and return its base URL.
async fn spawn(backend: Arc<FakeBackend>) -> String {
    let state = AppState::new(backend.clone(), backend, GateConfig::default());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    format!("http://{addr}")
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

const AUTH: &str = "is_authenticated=true";

// ---------------------------------------------------------------------------
// Leave
// ---------------------------------------------------------------------------

#[tokio::test]
async fn leave_deletes_and_reports_done() {
    let backend = backend(None);
    let base = spawn(backend.clone()).await;

    let resp = client()
        .post(format!("{base}/api/leave/2"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "message": "Done!" }));
    assert_eq!(*backend.deleted.lock().unwrap(), vec![ParticipantId(2)]);
    assert_eq!(backend.rows.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn leave_is_done_even_when_nothing_happens() {
    let backend = Arc::new(FakeBackend {
        fail_delete: true,
        ..Default::default()
    });
    let base = spawn(backend.clone()).await;

    for path in ["api/leave/99", "api/leave/not-a-number"] {
        let resp = client().post(format!("{base}/{path}")).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["message"], "Done!");
    }
    assert_eq!(*backend.deleted.lock().unwrap(), vec![ParticipantId(99)]);
}

// ---------------------------------------------------------------------------
// Gate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn correct_password_sets_cookie() {
    let base = spawn(backend(Some("correct horse"))).await;

    let resp = client()
        .post(format!("{base}/enter-password"))
        .json(&serde_json::json!({ "password": "correct horse" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(cookie.starts_with("is_authenticated=true"));
    assert!(cookie.contains("HttpOnly"));
    let toast: Toast = resp.json().await.unwrap();
    assert_eq!(toast, Toast::new("Success", "You have successfully joined the meeting."));
}

#[tokio::test]
async fn wrong_password_is_rejected_without_success() {
    let base = spawn(backend(Some("correct horse"))).await;

    let resp = client()
        .post(format!("{base}/enter-password"))
        .json(&serde_json::json!({ "password": "battery staple" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().get(header::SET_COOKIE).is_none());
    let toast: Toast = resp.json().await.unwrap();
    assert_eq!(toast, Toast::new("Invalid password", "Please try again."));
}

#[tokio::test]
async fn missing_password_row_is_invalid_password() {
    let base = spawn(backend(None)).await;

    let resp = client()
        .post(format!("{base}/enter-password"))
        .json(&serde_json::json!({ "password": "whatever123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn short_password_fails_validation() {
    let base = spawn(backend(Some("short"))).await;

    let resp = client()
        .post(format!("{base}/enter-password"))
        .json(&serde_json::json!({ "password": "short" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let toast: Toast = resp.json().await.unwrap();
    assert_eq!(toast.description, "Password must be at least 8 characters");
}

#[tokio::test]
async fn authenticated_visitors_skip_the_gate() {
    let base = spawn(backend(Some("correct horse"))).await;

    let resp = client()
        .get(format!("{base}/enter-password"))
        .header(header::COOKIE, AUTH)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[header::LOCATION], "/");

    let resp = client()
        .post(format!("{base}/enter-password"))
        .header(header::COOKIE, AUTH)
        .json(&serde_json::json!({ "password": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let resp = client()
        .get(format!("{base}/enter-password"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn authenticated_post_redirects_whatever_the_body() {
    let base = spawn(backend(Some("correct horse"))).await;

    let resp = client()
        .post(format!("{base}/enter-password"))
        .header(header::COOKIE, AUTH)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[header::LOCATION], "/");

    let resp = client()
        .post(format!("{base}/enter-password"))
        .header(header::COOKIE, AUTH)
        .header(header::CONTENT_TYPE, "text/plain")
        .body("password=whatever")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[header::LOCATION], "/");
}

#[tokio::test]
async fn unreadable_form_asks_for_a_password() {
    let base = spawn(backend(Some("correct horse"))).await;

    let resp = client()
        .post(format!("{base}/enter-password"))
        .header(header::CONTENT_TYPE, "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.headers().get(header::SET_COOKIE).is_none());
    let toast: Toast = resp.json().await.unwrap();
    assert_eq!(toast.description, "Password is required");
}

// ---------------------------------------------------------------------------
// Room & exit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn room_requires_cookie() {
    let base = spawn(backend(None)).await;

    let resp = client().get(format!("{base}/")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(resp.headers()[header::LOCATION], "/enter-password");

    let resp = client()
        .get(format!("{base}/"))
        .header(header::COOKIE, AUTH)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let room: Vec<Participant> = resp.json().await.unwrap();
    let names: Vec<_> = room.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Ada", "Grace"]);
}

#[tokio::test]
async fn exited_says_goodbye() {
    let base = spawn(backend(None)).await;
    let resp = client().get(format!("{base}/exited")).send().await.unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "You left the meeting.");
}
