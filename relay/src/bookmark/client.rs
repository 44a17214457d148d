//! Hoarder API client for creating link bookmarks.
//!
//! One bookmark per call, no retries. The caller (ultimately Miniflux) owns
//! retry behaviour when the webhook answers with a 5xx.

use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::event::Entry;

/// Bound on a whole bookmark call, connect through response body.
pub const BOOKMARK_TIMEOUT: Duration = Duration::from_secs(10);

/// Path of the bookmark creation endpoint, relative to the API base URL.
pub const BOOKMARKS_PATH: &str = "/api/v1/bookmarks";

/// Kind of bookmark being created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookmarkType {
    Link,
}

/// JSON body sent to `POST /api/v1/bookmarks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkRequest {
    #[serde(rename = "type")]
    pub kind: BookmarkType,
    pub url: String,
}

impl BookmarkRequest {
    pub fn link(url: impl Into<String>) -> Self {
        Self {
            kind: BookmarkType::Link,
            url: url.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum BookmarkError {
    #[error("unexpected status code: {status}, body: {body}")]
    Status { status: u16, body: String },

    #[error("failed to send request: {0}")]
    Network(#[from] reqwest::Error),

    #[error("failed to encode bookmark request: {0}")]
    Encode(#[from] serde_json::Error),
}

impl BookmarkError {
    /// Caller-safe description; network errors omit the API endpoint.
    pub fn summary(&self) -> String {
        match self {
            BookmarkError::Status { status, body } => {
                format!("bookmark API responded with status {status}: {body}")
            }
            BookmarkError::Network(e) if e.is_timeout() => "bookmark API timed out".to_string(),
            BookmarkError::Network(_) => "bookmark API unreachable".to_string(),
            BookmarkError::Encode(_) => "bookmark request could not be encoded".to_string(),
        }
    }
}

/// Capability to register an entry with the bookmarking service.
pub trait BookmarkSink: Send + Sync {
    fn add_bookmark<'a>(&'a self, entry: &'a Entry) -> BoxFuture<'a, Result<(), BookmarkError>>;
}

/// HTTP client for the Hoarder bookmark API.
#[derive(Clone)]
pub struct BookmarkClient {
    client: Client,
    endpoint: String,
    api_token: String,
}

impl BookmarkClient {
    /// Create a client with the default 10 second timeout.
    pub fn new(base_url: &str, api_token: &str) -> Result<Self, BookmarkError> {
        Self::with_timeout(base_url, api_token, BOOKMARK_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: &str,
        api_token: &str,
        timeout: Duration,
    ) -> Result<Self, BookmarkError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), BOOKMARKS_PATH),
            api_token: api_token.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Create a link bookmark for `entry.url`.
    pub async fn create_bookmark(&self, entry: &Entry) -> Result<(), BookmarkError> {
        let body = serde_json::to_vec(&BookmarkRequest::link(&entry.url))?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .bearer_auth(&self.api_token)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                error!(
                    url = %entry.url,
                    endpoint = %self.endpoint,
                    is_timeout = e.is_timeout(),
                    error = %e,
                    "bookmark_request_failed"
                );
                BookmarkError::Network(e)
            })?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if status != StatusCode::OK && status != StatusCode::CREATED {
            error!(
                url = %entry.url,
                status_code = status.as_u16(),
                body = %text,
                "bookmark_rejected"
            );
            return Err(BookmarkError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        info!(
            url = %entry.url,
            status_code = status.as_u16(),
            response = %text,
            "bookmark_created"
        );

        Ok(())
    }
}

impl BookmarkSink for BookmarkClient {
    fn add_bookmark<'a>(&'a self, entry: &'a Entry) -> BoxFuture<'a, Result<(), BookmarkError>> {
        self.create_bookmark(entry).boxed()
    }
}
