//! Webhook failure taxonomy and its HTTP mapping.

use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::bookmark::BookmarkError;
use crate::event::DecodeError;

/// Every way a webhook request can fail. Each maps to exactly one status.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Method not allowed: {0}")]
    InvalidMethod(Method),

    #[error("Missing signature")]
    MissingSignature,

    #[error("Error reading request body: {0}")]
    BodyReadFailure(String),

    #[error("Invalid signature")]
    SignatureMismatch,

    #[error("Unknown event type: {0}")]
    UnknownEventType(String),

    #[error("Error parsing payload: {0}")]
    MalformedPayload(String),

    /// Full detail stays in the logs; the response carries only the summary.
    #[error("{action}: {}", .source.summary())]
    DownstreamFailure {
        action: &'static str,
        #[source]
        source: BookmarkError,
    },
}

impl WebhookError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::InvalidMethod(_) => StatusCode::METHOD_NOT_ALLOWED,
            WebhookError::MissingSignature => StatusCode::BAD_REQUEST,
            WebhookError::BodyReadFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WebhookError::SignatureMismatch => StatusCode::UNAUTHORIZED,
            WebhookError::UnknownEventType(_) => StatusCode::BAD_REQUEST,
            WebhookError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            WebhookError::DownstreamFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DecodeError> for WebhookError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::UnknownEventType(value) => WebhookError::UnknownEventType(value),
            DecodeError::Malformed(e) => WebhookError::MalformedPayload(e.to_string()),
            mismatch @ DecodeError::EventTypeMismatch { .. } => {
                WebhookError::MalformedPayload(mismatch.to_string())
            }
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}
