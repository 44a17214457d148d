//! Hoarder Relay - Miniflux webhook to Hoarder bookmark bridge.
//!
//! Receives signed webhooks from Miniflux, verifies the HMAC signature over
//! the raw body, and saves the referenced entries as Hoarder link bookmarks.
//!
//! ## Architecture
//!
//! ```text
//! Miniflux → POST /webhook → verify → decode → Dispatcher → BookmarkClient → Hoarder
//! ```

pub mod bookmark;
pub mod config;
pub mod dispatch;
pub mod event;
pub mod web;

// Re-export commonly used types
pub use bookmark::{BookmarkClient, BookmarkError, BookmarkSink};
pub use config::{Config, ConfigError};
pub use dispatch::Dispatcher;
pub use event::{decode_event, WebhookEvent};
pub use web::{router, AppState, WebhookError};
