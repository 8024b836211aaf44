//! The revision store seam.
//!
//! [`RevisionSource`] is the only way the core reaches revision history.
//! Implementations are read-only from the core's point of view.
//! [`InMemoryRevisionSource`] backs tests and embedded use; the Postgres
//! implementation lives in the db crate.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::revision::Revision;
use crate::types::DbId;

/// Errors raised by a revision store.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The record (or one of its revisions) is unknown to the store.
    #[error("{}", not_found_message(*record_id, *revision_id))]
    NotFound {
        record_id: DbId,
        revision_id: Option<DbId>,
    },

    /// Any other store failure (connection, decoding, ...).
    #[error("Revision store error: {0}")]
    Backend(String),
}

fn not_found_message(record_id: DbId, revision_id: Option<DbId>) -> String {
    match revision_id {
        Some(revision_id) => format!("Revision {revision_id} of record {record_id} not found"),
        None => format!("Record {record_id} not found"),
    }
}

/// Supplies revision history for records.
#[async_trait]
pub trait RevisionSource: Send + Sync {
    /// Revision ids of a record, oldest first.
    async fn list_revision_ids(&self, record_id: DbId) -> Result<Vec<DbId>, SourceError>;

    /// Full snapshot of a record as of `revision_id`.
    async fn load_revision(&self, record_id: DbId, revision_id: DbId) -> Result<Revision, SourceError>;
}

/// Revision store held entirely in memory.
///
/// Revision ids are assumed to increase with creation time, so ascending
/// id order is chronological order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRevisionSource {
    records: BTreeMap<DbId, BTreeMap<DbId, Revision>>,
}

impl InMemoryRevisionSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a revision, replacing one with the same ids.
    pub fn insert(&mut self, revision: Revision) {
        self.records
            .entry(revision.record_id)
            .or_default()
            .insert(revision.revision_id, revision);
    }

    pub fn with_revisions<I>(revisions: I) -> Self
    where
        I: IntoIterator<Item = Revision>,
    {
        let mut source = Self::new();
        for revision in revisions {
            source.insert(revision);
        }
        source
    }

    /// Drop a revision, as a purge would.
    pub fn remove(&mut self, record_id: DbId, revision_id: DbId) -> Option<Revision> {
        self.records.get_mut(&record_id)?.remove(&revision_id)
    }
}

#[async_trait]
impl RevisionSource for InMemoryRevisionSource {
    async fn list_revision_ids(&self, record_id: DbId) -> Result<Vec<DbId>, SourceError> {
        self.records
            .get(&record_id)
            .map(|revisions| revisions.keys().copied().collect())
            .ok_or(SourceError::NotFound {
                record_id,
                revision_id: None,
            })
    }

    async fn load_revision(&self, record_id: DbId, revision_id: DbId) -> Result<Revision, SourceError> {
        self.records
            .get(&record_id)
            .and_then(|revisions| revisions.get(&revision_id))
            .cloned()
            .ok_or(SourceError::NotFound {
                record_id,
                revision_id: Some(revision_id),
            })
    }
}
