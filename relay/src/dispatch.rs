//! Webhook dispatch - verify, decode, and route to the bookmark handlers.
//!
//! Runs once per request with no state carried between requests. Entries of a
//! `new_entries` event are bookmarked in order and the first failure stops the
//! batch.

use std::sync::Arc;

use tracing::{info, warn};

use crate::bookmark::{BookmarkError, BookmarkSink};
use crate::event::{decode_event, Entry, Feed, WebhookEvent};
use crate::web::error::WebhookError;
use crate::web::signature::verify_signature;
use crate::Config;

/// Routes verified webhook events to the bookmark sink.
#[derive(Clone)]
pub struct Dispatcher {
    secret: Arc<[u8]>,
    save_new_entries: bool,
    bookmarks: Arc<dyn BookmarkSink>,
}

impl Dispatcher {
    pub fn new(
        secret: impl AsRef<[u8]>,
        save_new_entries: bool,
        bookmarks: Arc<dyn BookmarkSink>,
    ) -> Self {
        Self {
            secret: Arc::from(secret.as_ref()),
            save_new_entries,
            bookmarks,
        }
    }

    pub fn from_config(config: &Config, bookmarks: Arc<dyn BookmarkSink>) -> Self {
        Self::new(&config.webhook_secret, config.save_new_entries, bookmarks)
    }

    /// Verify, decode and handle one webhook body.
    ///
    /// The signature is checked against `raw` before any parsing. Returns the
    /// number of bookmarks created.
    pub async fn dispatch(
        &self,
        signature: &str,
        event_type: Option<&str>,
        raw: &[u8],
    ) -> Result<usize, WebhookError> {
        if !verify_signature(&self.secret, raw, signature) {
            return Err(WebhookError::SignatureMismatch);
        }

        let event = decode_event(event_type.unwrap_or_default(), raw).map_err(|e| {
            warn!(event_type = ?event_type, error = %e, "webhook_decode_failed");
            WebhookError::from(e)
        })?;

        match event {
            WebhookEvent::NewEntries(event) => {
                self.handle_new_entries(&event.feed, &event.entries).await
            }
            WebhookEvent::SaveEntry(event) => {
                self.handle_save_entry(&event.entry).await?;
                Ok(1)
            }
        }
    }

    async fn handle_new_entries(&self, feed: &Feed, entries: &[Entry]) -> Result<usize, WebhookError> {
        if !self.save_new_entries {
            info!(
                feed_title = %feed.title,
                entry_count = entries.len(),
                "new_entries_ignored"
            );
            return Ok(0);
        }

        info!(
            feed_id = feed.id,
            feed_title = %feed.title,
            entry_count = entries.len(),
            "new_entries_processing"
        );

        for (index, entry) in entries.iter().enumerate() {
            if let Err(e) = self.save(entry).await {
                warn!(
                    feed_title = %feed.title,
                    failed_index = index,
                    saved = index,
                    not_attempted = entries.len() - index - 1,
                    "new_entries_batch_aborted"
                );
                return Err(WebhookError::DownstreamFailure {
                    action: "Error processing entries",
                    source: e,
                });
            }
        }

        Ok(entries.len())
    }

    async fn handle_save_entry(&self, entry: &Entry) -> Result<(), WebhookError> {
        info!(title = %entry.title, url = %entry.url, "save_entry_processing");
        self.save(entry)
            .await
            .map_err(|e| WebhookError::DownstreamFailure {
                action: "Error processing saved entry",
                source: e,
            })
    }

    /// Submit one entry; the full error is logged here, callers only map it.
    async fn save(&self, entry: &Entry) -> Result<(), BookmarkError> {
        match self.bookmarks.add_bookmark(entry).await {
            Ok(()) => {
                info!(url = %entry.url, "bookmark_saved");
                Ok(())
            }
            Err(e) => {
                warn!(url = %entry.url, error = %e, "bookmark_save_failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use futures::future::{BoxFuture, FutureExt};

    use crate::bookmark::{BookmarkError, BookmarkSink};
    use crate::event::Entry;

    /// Records submitted URLs; fails every call whose URL is in `fail_on`.
    #[derive(Default)]
    pub struct RecordingSink {
        pub submitted: Mutex<Vec<String>>,
        pub fail_on: Vec<String>,
    }

    impl RecordingSink {
        pub fn failing_on(url: &str) -> Self {
            Self {
                fail_on: vec![url.to_string()],
                ..Default::default()
            }
        }

        pub fn urls(&self) -> Vec<String> {
            self.submitted.lock().unwrap().clone()
        }
    }

    impl BookmarkSink for RecordingSink {
        fn add_bookmark<'a>(
            &'a self,
            entry: &'a Entry,
        ) -> BoxFuture<'a, Result<(), BookmarkError>> {
            async move {
                self.submitted.lock().unwrap().push(entry.url.clone());
                if self.fail_on.contains(&entry.url) {
                    return Err(BookmarkError::Status {
                        status: 503,
                        body: "Service Unavailable".to_string(),
                    });
                }
                Ok(())
            }
            .boxed()
        }
    }
}
