//! HTTP backend.
//!
//! Talks to the deployment's environment-variable API:
//!
//! - `GET  {url}/api/v1/list_environment_variables`
//!   → `{"environmentVariables": {"NAME": "value"}}`
//! - `POST {url}/api/v1/update_environment_variables`
//!   with `{"changes": [{"name": "NAME", "value": "value"}]}`
//!
//! Both carry `Authorization: Convex <admin or deploy key>`.

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, trace};

use super::RemoteStore;
use crate::core::domain::Credential;
use crate::error::{RemoteError, RemoteResult};

const LIST_PATH: &str = "/api/v1/list_environment_variables";
const UPDATE_PATH: &str = "/api/v1/update_environment_variables";

/// Longest error body echoed back to the user.
const MAX_ERROR_BODY: usize = 200;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    environment_variables: BTreeMap<String, String>,
}

#[derive(Serialize)]
struct UpdateRequest<'a> {
    changes: [Change<'a>; 1],
}

#[derive(Serialize)]
struct Change<'a> {
    name: &'a str,
    value: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Remote store reached over the deployment HTTP API.
pub struct Http {
    client: Client,
    base_url: String,
    auth: Credential,
}

impl Http {
    /// Create a client for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Unavailable` if the HTTP client cannot be built.
    pub fn new(base_url: &str, auth: Credential, timeout: Duration) -> RemoteResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(concat!("envsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RemoteError::Unavailable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn auth_header(&self) -> String {
        format!("Convex {}", self.auth.expose())
    }

    fn fetch_all(&self) -> RemoteResult<BTreeMap<String, String>> {
        let url = format!("{}{}", self.base_url, LIST_PATH);
        trace!(url = %url, "listing environment variables");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .send()
            .map_err(transport_error)?;

        let body: ListResponse = check_status(response)?
            .json()
            .map_err(|e| RemoteError::Protocol(format!("invalid list response: {}", e)))?;

        debug!(count = body.environment_variables.len(), "listed environment variables");
        Ok(body.environment_variables)
    }
}

impl RemoteStore for Http {
    fn name(&self) -> &'static str {
        "http"
    }

    fn get(&self, key: &str) -> RemoteResult<Option<String>> {
        Ok(self.fetch_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> RemoteResult<()> {
        let url = format!("{}{}", self.base_url, UPDATE_PATH);
        trace!(key, value_len = value.len(), "updating environment variable");

        let body = UpdateRequest {
            changes: [Change { name: key, value }],
        };

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .json(&body)
            .send()
            .map_err(transport_error)?;

        check_status(response)?;
        Ok(())
    }

    fn list(&self) -> RemoteResult<Vec<String>> {
        Ok(self.fetch_all()?.into_keys().collect())
    }

    fn snapshot(&self) -> RemoteResult<BTreeMap<String, String>> {
        self.fetch_all()
    }
}

fn transport_error(err: reqwest::Error) -> RemoteError {
    if err.is_timeout() {
        RemoteError::Unavailable(format!("request timed out: {}", err))
    } else if err.is_connect() {
        RemoteError::Unavailable(format!("connection failed: {}", err))
    } else {
        RemoteError::Unavailable(err.to_string())
    }
}

fn check_status(response: Response) -> RemoteResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = error_message(response.text().unwrap_or_default());
    debug!(status = status.as_u16(), "remote store returned an error");

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RemoteError::Authentication(message),
        StatusCode::TOO_MANY_REQUESTS
        | StatusCode::REQUEST_TIMEOUT
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => RemoteError::Unavailable(format!("{}: {}", status, message)),
        s if s.is_server_error() => RemoteError::Unavailable(format!("{}: {}", status, message)),
        s => RemoteError::Rejected {
            status: s.as_u16(),
            message,
        },
    })
}

/// Prefer `code: message` from a JSON error body; fall back to the raw text.
fn error_message(body: String) -> String {
    if let Ok(err) = serde_json::from_str::<ErrorBody>(&body) {
        match (err.code, err.message) {
            (Some(code), Some(message)) => return format!("{}: {}", code, message),
            (None, Some(message)) | (Some(message), None) => return message,
            (None, None) => {}
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "no response body".to_string();
    }
    trimmed.chars().take(MAX_ERROR_BODY).collect()
}
