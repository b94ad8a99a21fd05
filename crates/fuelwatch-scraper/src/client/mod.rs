//! HTTP client for retailer price feeds.

mod content;

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde_json::Value;

use fuelwatch_core::RetailerSource;

use crate::error::{FetchError, FetchFailure};

use content::{is_markup_content_type, looks_like_markup, preview};

/// Number of body characters logged at `debug` for each payload.
const PREVIEW_CHARS: usize = 200;

/// Fetches retailer feeds as raw JSON.
///
/// Every failure, including timeouts, non-2xx statuses and markup bodies,
/// comes back as a [`FetchFailure`]. Nothing is retried.
#[derive(Debug, Clone)]
pub struct RetailerClient {
    client: Client,
}

impl RetailerClient {
    /// Creates a `RetailerClient` with the given request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Transport`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches `source`'s feed and parses it as JSON.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchFailure`] naming the retailer when:
    /// - the endpoint is not an absolute URL ([`FetchError::InvalidEndpoint`]),
    /// - the request fails or times out ([`FetchError::Transport`]),
    /// - the status is not 2xx ([`FetchError::UnexpectedStatus`]),
    /// - the response is markup ([`FetchError::UnsupportedFormat`]),
    /// - the body is not valid JSON ([`FetchError::Deserialize`]).
    pub async fn fetch(&self, source: &RetailerSource) -> Result<Value, FetchFailure> {
        self.fetch_json(&source.endpoint)
            .await
            .map_err(|cause| FetchFailure::new(source, cause))
    }

    async fn fetch_json(&self, endpoint: &str) -> Result<Value, FetchError> {
        let url = Url::parse(endpoint).map_err(|e| FetchError::InvalidEndpoint {
            endpoint: endpoint.to_owned(),
            reason: e.to_string(),
        })?;

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: endpoint.to_owned(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_ascii_lowercase);

        if let Some(content_type) = content_type.as_deref() {
            if is_markup_content_type(content_type) {
                return Err(FetchError::UnsupportedFormat {
                    content_type: content_type.to_owned(),
                });
            }
        }

        let body = response.text().await?;
        tracing::debug!(
            endpoint,
            bytes = body.len(),
            preview = %preview(&body, PREVIEW_CHARS),
            "received retailer payload"
        );

        serde_json::from_str::<Value>(&body).map_err(|e| {
            if looks_like_markup(&body) {
                FetchError::UnsupportedFormat {
                    content_type: content_type.unwrap_or_else(|| "unknown".to_string()),
                }
            } else {
                FetchError::Deserialize {
                    context: format!("payload from {endpoint}"),
                    source: e,
                }
            }
        })
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
