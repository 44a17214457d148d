//! Miniflux webhook payload types.
//!
//! These mirror the JSON Miniflux posts for its two webhook events:
//! - `new_entries`: a feed refresh produced one or more unread entries
//! - `save_entry`: a user pressed "Save" on a single entry
//!
//! Only `Entry::title` and `Entry::url` drive the relay; everything else is
//! carried so the payload decodes as sent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Event type for a feed refresh that found new entries.
pub const NEW_ENTRIES: &str = "new_entries";

/// Event type for an entry the user explicitly saved.
pub const SAVE_ENTRY: &str = "save_entry";

/// A subscribed feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    pub id: i64,
    #[serde(default)]
    pub user_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub feed_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub site_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub checked_at: Option<DateTime<Utc>>,
}

/// Attached media for an entry (podcast audio, images, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Enclosure {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub user_id: i64,
    #[serde(default)]
    pub entry_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mime_type: String,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub media_progression: i64,
}

/// A single feed item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    #[serde(default)]
    pub user_id: i64,
    #[serde(default)]
    pub feed_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hash: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments_url: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub changed_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub share_code: String,
    #[serde(default)]
    pub starred: bool,
    /// Estimated reading time in minutes
    #[serde(default)]
    pub reading_time: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub enclosures: Vec<Enclosure>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed: Option<Feed>,
}

/// Payload of a `new_entries` webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEntriesEvent {
    #[serde(default)]
    pub event_type: Option<String>,
    /// Required key; `null` decodes as an empty feed
    #[serde(deserialize_with = "null_as_default")]
    pub feed: Feed,
    /// Required key; `null` decodes as no entries
    #[serde(deserialize_with = "null_as_default")]
    pub entries: Vec<Entry>,
}

/// Payload of a `save_entry` webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveEntryEvent {
    #[serde(default)]
    pub event_type: Option<String>,
    pub entry: Entry,
}

/// Miniflux emits `null` for empty strings and lists in some versions.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
