//! Fixtures shared by the unit tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::eligibility::EligibilityPolicy;
use crate::field::{FieldKind, FieldValue};
use crate::revision::{Author, Revision};
use crate::schema::{Cardinality, FieldDefinition, Schema};
use crate::source::{RevisionSource, SourceError};
use crate::types::{DbId, Timestamp};

pub const RECORD_ID: DbId = 1;

/// Route `tracing` output to the test harness; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn timestamp(minutes: i64) -> Timestamp {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::minutes(minutes)
}

/// An `node/article` revision of record 1 carrying several fields.
pub fn revision(revision_id: DbId, fields: &[(&str, FieldValue)], is_current: bool) -> Revision {
    Revision {
        revision_id,
        record_id: RECORD_ID,
        record_type: "node".into(),
        bundle: "article".into(),
        langcode: "en".into(),
        timestamp: timestamp(revision_id),
        author: Some(Author {
            id: 5,
            display_name: "editor".into(),
        }),
        log_message: None,
        is_current,
        fields: fields
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect::<BTreeMap<_, _>>(),
        translations: BTreeMap::new(),
    }
}

/// A revision carrying one text field.
pub fn text_revision(revision_id: DbId, field: &str, text: &str, is_current: bool) -> Revision {
    revision(revision_id, &[(field, FieldValue::text(text))], is_current)
}

pub fn article_schema() -> Schema {
    Schema::new()
        .with_field("node", "article", FieldDefinition::new("title", "Title", FieldKind::Text).base_field())
        .with_field("node", "article", FieldDefinition::new("body", "Body", FieldKind::Text))
        .with_field(
            "node",
            "article",
            FieldDefinition::new("field_tags", "Tags", FieldKind::Reference)
                .with_cardinality(Cardinality::Unlimited),
        )
        .with_field("node", "article", FieldDefinition::new("comment", "Comments", FieldKind::Text))
}

/// Policy that disables every field.
pub struct TrackingDisabled;

impl EligibilityPolicy for TrackingDisabled {
    fn is_tracking_enabled(&self, _record_type: &str, _bundle: &str, _field_name: &str) -> bool {
        false
    }
}

/// Wraps a source and counts every call made through it.
pub struct CountingSource<S> {
    inner: S,
    calls: AtomicUsize,
}

impl<S> CountingSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<S: RevisionSource> RevisionSource for CountingSource<S> {
    async fn list_revision_ids(&self, record_id: DbId) -> Result<Vec<DbId>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.list_revision_ids(record_id).await
    }

    async fn load_revision(&self, record_id: DbId, revision_id: DbId) -> Result<Revision, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.load_revision(record_id, revision_id).await
    }
}

/// Lists the given ids but fails to load `broken`.
pub struct BrokenSource {
    pub ids: Vec<DbId>,
    pub broken: DbId,
    pub inner: crate::source::InMemoryRevisionSource,
}

#[async_trait]
impl RevisionSource for BrokenSource {
    async fn list_revision_ids(&self, _record_id: DbId) -> Result<Vec<DbId>, SourceError> {
        Ok(self.ids.clone())
    }

    async fn load_revision(&self, record_id: DbId, revision_id: DbId) -> Result<Revision, SourceError> {
        if revision_id == self.broken {
            return Err(SourceError::Backend("connection reset".into()));
        }
        self.inner.load_revision(record_id, revision_id).await
    }
}
