//! Miniflux webhook events.
//!
//! This module provides:
//! - Payload types for `new_entries` and `save_entry`
//! - Header-driven decoding into a typed `WebhookEvent`

pub mod decode;
pub mod types;

pub use decode::{decode_event, DecodeError, WebhookEvent, EVENT_TYPE_HEADER};
pub use types::{
    Enclosure, Entry, Feed, NewEntriesEvent, SaveEntryEvent, NEW_ENTRIES, SAVE_ENTRY,
};
