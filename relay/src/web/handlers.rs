//! HTTP endpoint handlers.
//!
//! The webhook handler owns the request-shaped checks (method, headers, body)
//! and hands the raw bytes to the [`Dispatcher`] for everything else.

use std::sync::Arc;

use axum::{
    body::{self, Body},
    extract::State,
    http::{HeaderMap, Method, StatusCode},
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::dispatch::Dispatcher;
use crate::event::EVENT_TYPE_HEADER;
use crate::web::error::WebhookError;
use crate::web::signature::SIGNATURE_HEADER;
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub dispatcher: Dispatcher,
}

impl AppState {
    pub fn new(config: Config, dispatcher: Dispatcher) -> Self {
        Self {
            config: Arc::new(config),
            dispatcher,
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/webhook", any(webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Miniflux Webhook
// =============================================================================

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

/// Miniflux webhook endpoint.
///
/// This endpoint:
/// 1. Rejects anything but POST
/// 2. Requires `X-Miniflux-Signature`
/// 3. Reads the raw body and dispatches it
/// 4. Returns 200 with an empty body
pub async fn webhook(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Body,
) -> Result<StatusCode, WebhookError> {
    if method != Method::POST {
        warn!(method = %method, "webhook_method_not_allowed");
        return Err(WebhookError::InvalidMethod(method));
    }

    let signature = match header_str(&headers, SIGNATURE_HEADER) {
        Some(s) => s,
        None => {
            warn!("webhook_signature_missing");
            return Err(WebhookError::MissingSignature);
        }
    };

    let event_type = header_str(&headers, EVENT_TYPE_HEADER);

    let raw = body::to_bytes(body, state.config.max_body_bytes)
        .await
        .map_err(|e| {
            error!(error = %e, "webhook_body_read_failed");
            WebhookError::BodyReadFailure(e.to_string())
        })?;

    info!(
        event_type = ?event_type,
        body_length = raw.len(),
        "webhook_received"
    );

    let saved = state.dispatcher.dispatch(signature, event_type, &raw).await?;

    info!(event_type = ?event_type, bookmarks_saved = saved, "webhook_processed");

    Ok(StatusCode::OK)
}
