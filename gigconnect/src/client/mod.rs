//! HTTP client for the GigConnect API.
//!
//! - [`GigConnectClient`] wraps the two worker endpoints
//! - [`SearchSession`] reproduces the search page: input trimming, the empty-input prompt and the
//!   per-search result cache
//! - [`RegistrationForm`] reproduces the registration page checks and outcome messages

mod registration;
mod session;

pub use registration::{FormError, RegistrationForm, RegistrationOutcome, RegistrationPayload};
pub use session::{SearchSession, SearchView};

use log::debug;
use serde::Serialize;
use thiserror::Error;

use crate::model::WorkerRecord;

const WORKERS_PATH: &str = "/api/workers";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
}

/// Search terms sent to `GET /api/workers`. Absent terms are left out of the query string.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkerQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GigConnectClient {
    http: reqwest::Client,
    base_url: String,
}

impl GigConnectClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn workers_url(&self) -> String {
        format!("{}{}", self.base_url, WORKERS_PATH)
    }

    pub async fn search_workers(&self, query: &WorkerQuery) -> Result<Vec<WorkerRecord>, ClientError> {
        let response = self.http.get(self.workers_url()).query(query).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let workers: Vec<WorkerRecord> = serde_json::from_str(&body)?;
        debug!("search returned {} workers", workers.len());
        Ok(workers)
    }

    /// Submits a registration. Every HTTP status maps to an outcome; only transport failures error.
    pub async fn register(&self, payload: &RegistrationPayload) -> Result<RegistrationOutcome, ClientError> {
        let response = self.http.post(self.workers_url()).json(payload).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        let body = serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);

        Ok(RegistrationOutcome::from_response(status, &body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_skips_absent_terms() {
        let query = WorkerQuery {
            skill: Some("plumb".to_string()),
            name: None,
            city: Some("Austin".to_string()),
        };
        let encoded = serde_urlencoded::to_string(&query).expect("encodes");
        assert_eq!(encoded, "skill=plumb&city=Austin");
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = GigConnectClient::new("http://localhost:3000/");
        assert_eq!(client.workers_url(), "http://localhost:3000/api/workers");
    }
}
