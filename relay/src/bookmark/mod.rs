//! Bookmark module for the Hoarder API.
//!
//! This module provides:
//! - The `BookmarkSink` capability the dispatcher depends on
//! - `BookmarkClient`, the reqwest-backed implementation

pub mod client;

pub use client::{
    BookmarkClient, BookmarkError, BookmarkRequest, BookmarkSink, BookmarkType,
    BOOKMARK_TIMEOUT, BOOKMARKS_PATH,
};
