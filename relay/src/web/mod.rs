//! Web server module for receiving Miniflux webhooks.
//!
//! This module provides:
//! - Raw-body HMAC verification of `X-Miniflux-Signature`
//! - The `/webhook` and `/health` handlers
//! - The error taxonomy and its status code mapping

pub mod error;
pub mod handlers;
pub mod signature;

pub use error::WebhookError;
pub use handlers::{health, router, webhook, AppState, HealthResponse};
pub use signature::{verify_signature, SIGNATURE_HEADER};
