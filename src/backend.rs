use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{Method, StatusCode};
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("sabio/", env!("CARGO_PKG_VERSION"));
const TIMEOUT_SECS: u64 = 10;

/// Failure reported by the hosted service, already reduced to something a
/// viewer can read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct RemoteError(pub String);

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        RemoteError(err.to_string())
    }
}

/// Connection details for the hosted auth + database service
#[derive(Debug, Clone)]
pub struct Backend {
    base_url: String,
    anon_key: String,
    client: Client,
}

impl Backend {
    pub fn new(base_url: &str, anon_key: &str) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Request carrying the project key, acting as the anonymous role
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.request_as(method, url, &self.anon_key)
    }

    /// Request carrying the project key and a user's access token
    pub fn request_as(&self, method: Method, url: &str, bearer: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    /// Send and return the body of a successful response
    pub fn send(&self, request: RequestBuilder) -> Result<String, RemoteError> {
        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;

        if status.is_success() {
            Ok(body)
        } else {
            tracing::warn!(%status, "remote call failed");
            Err(RemoteError(error_message(status, &body)))
        }
    }
}

/// Pick the human-readable message out of an error body
pub fn error_message(status: StatusCode, body: &str) -> String {
    const KEYS: [&str; 4] = ["error_description", "msg", "message", "error"];

    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            KEYS.iter().find_map(|key| {
                value
                    .get(key)
                    .and_then(|v| v.as_str())
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
        })
        .unwrap_or_else(|| format!("request failed with status {status}"))
}
