//! PostgREST client for the participants and config tables.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use standup_config::schema::SupabaseConfig;
use tracing::debug;

use super::{ConfigStore, ParticipantStore, RemoteError};
use crate::participant::{NewParticipant, Participant, ParticipantId, ParticipantPatch};

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const RETURN_REPRESENTATION: &str = "return=representation";

/// Supabase REST (PostgREST) client.
#[derive(Clone)]
pub struct PostgrestClient {
    http: reqwest::Client,
    rest_url: String,
    api_key: String,
    schema: String,
    participants_table: String,
    config_table: String,
}

impl std::fmt::Debug for PostgrestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgrestClient")
            .field("rest_url", &self.rest_url)
            .field("api_key", &"[REDACTED]")
            .field("schema", &self.schema)
            .field("participants_table", &self.participants_table)
            .finish()
    }
}

/// Row of the config table.
#[derive(Debug, Deserialize)]
struct ConfigRow {
    value: String,
}

/// PostgREST error body.
#[derive(Debug, Deserialize)]
struct PostgrestErrorBody {
    message: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

impl PostgrestClient {
    pub fn new(config: &SupabaseConfig) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(u64::from(config.request_timeout)))
            .build()
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        Ok(Self {
            http,
            rest_url: format!("{}/rest/v1", config.url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            schema: config.schema.clone(),
            participants_table: config.participants_table.clone(),
            config_table: config.config_table.clone(),
        })
    }

    /// URL of `table` with the given query pairs, percent-encoded.
    pub(crate) fn table_url(&self, table: &str, params: &[(&str, String)]) -> Result<Url, RemoteError> {
        Url::parse_with_params(&format!("{}/{table}", self.rest_url), params)
            .map_err(|e| RemoteError::Parse(format!("invalid URL: {e}")))
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(key) = HeaderValue::from_str(&self.api_key) {
            headers.insert("apikey", key);
        }
        if let Ok(bearer) = HeaderValue::from_str(&format!("Bearer {}", self.api_key)) {
            headers.insert(AUTHORIZATION, bearer);
        }
        if let Ok(schema) = HeaderValue::from_str(&self.schema) {
            headers.insert("accept-profile", schema.clone());
            headers.insert("content-profile", schema);
        }
        headers
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http.request(method, url).headers(self.auth_headers())
    }

    /// Request returning exactly one row, stored representation included.
    fn single_row_request(&self, method: Method, url: Url) -> RequestBuilder {
        self.request(method, url)
            .header(ACCEPT, SINGLE_OBJECT)
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", RETURN_REPRESENTATION)
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, RemoteError> {
        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(decode_error(status, &body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| RemoteError::Parse(e.to_string()))
    }

    async fn send_empty(request: RequestBuilder) -> Result<(), RemoteError> {
        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(decode_error(status, &body));
        }
        Ok(())
    }
}

/// Turn a non-2xx PostgREST response into a [`RemoteError`].
pub(crate) fn decode_error(status: StatusCode, body: &str) -> RemoteError {
    let message = match serde_json::from_str::<PostgrestErrorBody>(body) {
        Ok(PostgrestErrorBody {
            message: Some(message),
            details,
            hint,
        }) => {
            let mut text = message;
            for extra in [details, hint].into_iter().flatten() {
                if !extra.is_empty() {
                    text.push_str(" (");
                    text.push_str(&extra);
                    text.push(')');
                }
            }
            text
        }
        _ => {
            let snippet: String = body.chars().take(200).collect();
            if snippet.trim().is_empty() {
                format!("HTTP {status}")
            } else {
                format!("HTTP {status}: {snippet}")
            }
        }
    };
    RemoteError::Api {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl ParticipantStore for PostgrestClient {
    async fn select_all(&self) -> Result<Vec<Participant>, RemoteError> {
        let url = self.table_url(
            &self.participants_table,
            &[("select", "*".into()), ("order", "id.asc".into())],
        )?;
        debug!(table = %self.participants_table, "select all participants");
        Self::send_json(self.request(Method::GET, url)).await
    }

    async fn insert(&self, new: &NewParticipant) -> Result<Participant, RemoteError> {
        let url = self.table_url(&self.participants_table, &[("select", "*".into())])?;
        debug!(name = %new.name, "insert participant");
        Self::send_json(self.single_row_request(Method::POST, url).json(new)).await
    }

    async fn update(
        &self,
        id: ParticipantId,
        patch: &ParticipantPatch,
    ) -> Result<Participant, RemoteError> {
        let url = self.table_url(
            &self.participants_table,
            &[("id", format!("eq.{id}")), ("select", "*".into())],
        )?;
        debug!(%id, ?patch, "update participant");
        Self::send_json(self.single_row_request(Method::PATCH, url).json(patch)).await
    }

    async fn delete(&self, id: ParticipantId) -> Result<(), RemoteError> {
        let url = self.table_url(&self.participants_table, &[("id", format!("eq.{id}"))])?;
        debug!(%id, "delete participant");
        Self::send_empty(self.request(Method::DELETE, url)).await
    }
}

#[async_trait]
impl ConfigStore for PostgrestClient {
    async fn config_value(&self, key: &str) -> Result<String, RemoteError> {
        let url = self.table_url(
            &self.config_table,
            &[("select", "*".into()), ("key", format!("eq.{key}"))],
        )?;
        let row: ConfigRow =
            Self::send_json(self.request(Method::GET, url).header(ACCEPT, SINGLE_OBJECT)).await?;
        Ok(row.value)
    }
}
