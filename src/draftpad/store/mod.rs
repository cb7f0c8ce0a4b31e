//! # Storage Layer
//!
//! This module defines the storage abstraction for draftpad. The [`DocumentStore`]
//! trait is the only way the session and the command layer reach persisted data.
//!
//! ## Two Kinds of Records
//!
//! - **Autosave slot**: one overwritable [`AutosaveRecord`]. Crash recovery only,
//!   never consulted to decide whether the buffer is "saved".
//! - **Document collection**: user-named [`Document`]s with store-assigned ids.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: Production JSON storage
//!   - Documents in `documents.json`, autosave slot in `autosave.json`
//!   - Every write replaces the file atomically (tmp file + rename)
//!
//! - [`memory::InMemoryStore`]: In-memory storage for testing and throwaway sessions
//!
//! ## Ordering
//!
//! `list` and `search` return documents newest-first by `updated_at`. Each store
//! hands out strictly increasing timestamps (see [`next_timestamp`]) so two
//! writes within the same clock tick still order deterministically.
//!
//! ## Async Contract
//!
//! All methods return `Send` futures so the schedulers can drive them from
//! spawned tasks. Stores do not support cancellation: once a call is started
//! the caller awaits it to completion and decides afterwards whether the
//! result still matters.

use crate::error::StoreResult;
use crate::model::{AutosaveRecord, Document, DocumentId};
use chrono::{DateTime, Duration, Utc};
use std::future::Future;

pub mod fs;
pub mod memory;

/// Abstract interface for document persistence.
pub trait DocumentStore: Send + Sync + 'static {
    /// Overwrite the autosave slot
    fn autosave_write(&self, content: &str) -> impl Future<Output = StoreResult<()>> + Send;

    /// Read the autosave slot, `None` if nothing was ever autosaved
    fn autosave_read(&self) -> impl Future<Output = StoreResult<Option<AutosaveRecord>>> + Send;

    /// Create a new document and return its id
    fn create(
        &self,
        title: &str,
        content: &str,
    ) -> impl Future<Output = StoreResult<DocumentId>> + Send;

    /// Replace title and content; fails with `NotFound` if the id is absent
    fn update(
        &self,
        id: DocumentId,
        title: &str,
        content: &str,
    ) -> impl Future<Output = StoreResult<()>> + Send;

    /// Get a document by id
    fn get(&self, id: DocumentId) -> impl Future<Output = StoreResult<Option<Document>>> + Send;

    /// All documents, newest `updated_at` first
    fn list(&self) -> impl Future<Output = StoreResult<Vec<Document>>> + Send;

    /// Case-insensitive title substring match, newest `updated_at` first
    fn search(&self, query: &str) -> impl Future<Output = StoreResult<Vec<Document>>> + Send;

    /// Change only the title; fails with `NotFound` if the id is absent
    fn rename(&self, id: DocumentId, title: &str)
        -> impl Future<Output = StoreResult<()>> + Send;

    /// Delete permanently; fails with `NotFound` if the id is absent
    fn delete(&self, id: DocumentId) -> impl Future<Output = StoreResult<()>> + Send;
}

/// Returns `Utc::now()`, bumped past `last` when the clock has not advanced.
pub(crate) fn next_timestamp(last: &mut Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    let stamp = match *last {
        Some(prev) if now <= prev => prev + Duration::microseconds(1),
        _ => now,
    };
    *last = Some(stamp);
    stamp
}

pub(crate) fn sort_newest_first(docs: &mut [Document]) {
    docs.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

pub(crate) fn title_matches(doc: &Document, query_lower: &str) -> bool {
    doc.title.to_lowercase().contains(query_lower)
}
