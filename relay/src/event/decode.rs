//! Event decoding keyed by the `X-Miniflux-Event-Type` header.

use thiserror::Error;
use tracing::warn;

use super::types::{NewEntriesEvent, SaveEntryEvent, NEW_ENTRIES, SAVE_ENTRY};

/// Header naming which event shape the body holds.
pub const EVENT_TYPE_HEADER: &str = "X-Miniflux-Event-Type";

/// A decoded, verified webhook event.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookEvent {
    NewEntries(NewEntriesEvent),
    SaveEntry(SaveEntryEvent),
}

impl WebhookEvent {
    /// The event type this value was decoded as.
    pub fn event_type(&self) -> &'static str {
        match self {
            WebhookEvent::NewEntries(_) => NEW_ENTRIES,
            WebhookEvent::SaveEntry(_) => SAVE_ENTRY,
        }
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Unknown event type: {0}")]
    UnknownEventType(String),

    #[error("Error parsing payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Event type mismatch: header says {header}, body says {body}")]
    EventTypeMismatch { header: String, body: String },
}

/// Decode `raw` as the event named by `event_type`.
///
/// The header value is authoritative. A non-empty `event_type` field in the
/// body that disagrees with it is rejected rather than ignored.
pub fn decode_event(event_type: &str, raw: &[u8]) -> Result<WebhookEvent, DecodeError> {
    let (event, body_type) = match event_type {
        NEW_ENTRIES => {
            let payload: NewEntriesEvent = serde_json::from_slice(raw)?;
            let body_type = payload.event_type.clone();
            (WebhookEvent::NewEntries(payload), body_type)
        }
        SAVE_ENTRY => {
            let payload: SaveEntryEvent = serde_json::from_slice(raw)?;
            let body_type = payload.event_type.clone();
            (WebhookEvent::SaveEntry(payload), body_type)
        }
        other => return Err(DecodeError::UnknownEventType(other.to_string())),
    };

    match body_type {
        Some(body) if !body.is_empty() && body != event_type => {
            warn!(header = %event_type, body = %body, "webhook_event_type_mismatch");
            Err(DecodeError::EventTypeMismatch {
                header: event_type.to_string(),
                body,
            })
        }
        _ => Ok(event),
    }
}
