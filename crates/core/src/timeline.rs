//! Per-field revision timelines.
//!
//! [`TimelineBuilder::build`] walks a record's revisions oldest to newest,
//! classifies each field value as changed or unchanged against the
//! revision before it, pins the current revision's value as always
//! visible, and returns the rows newest first.
//!
//! Unchanged, non-current rows carry [`DisplayValue::Unchanged`] instead of
//! the value and are flagged collapsible; a renderer shows them only after
//! the editor asks for hidden values.

use std::sync::Arc;

use futures::{stream, StreamExt, TryStreamExt};
use serde::Serialize;

use crate::config::HistoryConfig;
use crate::eligibility::EligibilityPolicy;
use crate::error::CoreError;
use crate::field::{FieldAccessor, FieldValue};
use crate::restore::RestoreRequest;
use crate::revision::{Author, Revision, TranslationSelection};
use crate::schema::{FieldDefinition, Schema};
use crate::source::{RevisionSource, SourceError};
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// What a row shows in its value column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DisplayValue {
    /// The field's real, non-empty value.
    Value(FieldValue),
    /// The real value, which is empty (or the field was absent).
    Empty,
    /// Placeholder: same as the previous revision.
    Unchanged,
}

impl DisplayValue {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Unchanged)
    }
}

/// Where a revision stands relative to the record's head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RevisionStatus {
    /// The authoritative revision.
    Current,
    /// The newest revision, saved but not yet current (a pending draft).
    Latest,
    Historical,
}

/// An affordance offered on a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RevisionAction {
    /// Restore this row's value into the edit form.
    RestoreValue(RestoreRequest),
    /// Open the whole record as of this revision.
    ViewRevision {
        record_id: DbId,
        revision_id: DbId,
        /// Set only for multilingual records.
        langcode: Option<String>,
    },
    /// Revert the whole record to this revision.
    RevertRecord {
        record_id: DbId,
        revision_id: DbId,
        langcode: Option<String>,
    },
}

/// One revision in a field timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineRow {
    pub revision_id: DbId,
    pub display: DisplayValue,
    pub is_current: bool,
    pub is_collapsible: bool,
    pub status: RevisionStatus,
    /// True for the revision that created the record.
    pub is_created: bool,
    pub date: Timestamp,
    /// `None` when the author was deleted.
    pub author: Option<Author>,
    pub log_message: Option<String>,
    pub actions: Vec<RevisionAction>,
}

/// A field's timeline, newest revision first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    pub field_label: String,
    pub rows: Vec<TimelineRow>,
    /// Some non-current row is collapsed behind a placeholder.
    pub has_collapsed_rows: bool,
}

impl Timeline {
    pub fn empty(field_label: impl Into<String>) -> Self {
        Self {
            field_label: field_label.into(),
            rows: Vec::new(),
            has_collapsed_rows: false,
        }
    }
}

/// Identifies the field whose timeline is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineRequest {
    pub record_id: DbId,
    pub record_type: String,
    pub bundle: String,
    pub field_name: String,
    pub langcode: String,
}

// ---------------------------------------------------------------------------
// Access
// ---------------------------------------------------------------------------

/// Per-revision permissions of the editor viewing the timeline.
pub trait RevisionAccess: Send + Sync {
    fn can_view(&self, revision: &Revision) -> bool;
    fn can_revert(&self, revision: &Revision) -> bool;
}

/// Grants every permission.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullAccess;

impl RevisionAccess for FullAccess {
    fn can_view(&self, _revision: &Revision) -> bool {
        true
    }

    fn can_revert(&self, _revision: &Revision) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builds field timelines from a revision source.
pub struct TimelineBuilder {
    source: Arc<dyn RevisionSource>,
    policy: Arc<dyn EligibilityPolicy>,
    schema: Arc<Schema>,
    access: Arc<dyn RevisionAccess>,
    max_concurrent_loads: usize,
}

impl TimelineBuilder {
    pub fn new(
        source: Arc<dyn RevisionSource>,
        policy: Arc<dyn EligibilityPolicy>,
        schema: Arc<Schema>,
    ) -> Self {
        Self {
            source,
            policy,
            schema,
            access: Arc::new(FullAccess),
            max_concurrent_loads: HistoryConfig::default().max_concurrent_loads,
        }
    }

    pub fn with_access(mut self, access: Arc<dyn RevisionAccess>) -> Self {
        self.access = access;
        self
    }

    pub fn with_config(mut self, config: &HistoryConfig) -> Self {
        self.max_concurrent_loads = config.max_concurrent_loads.max(1);
        self
    }

    /// Build the timeline of one field.
    ///
    /// Returns an empty timeline when tracking is disabled for the field
    /// (checked before any I/O), when the field has no definition, or when
    /// the record has no revisions. Fails with [`CoreError::LoadFailure`] if
    /// any revision cannot be loaded; partial timelines are never returned.
    pub async fn build(&self, request: &TimelineRequest) -> Result<Timeline, CoreError> {
        let field_label =
            self.schema
                .field_label(&request.record_type, &request.bundle, &request.field_name);

        if !self
            .policy
            .is_tracking_enabled(&request.record_type, &request.bundle, &request.field_name)
        {
            tracing::debug!(
                record_type = %request.record_type,
                bundle = %request.bundle,
                field_name = %request.field_name,
                "History tracking disabled, skipping timeline"
            );
            return Ok(Timeline::empty(field_label));
        }

        let Some(definition) =
            self.schema
                .definition(&request.record_type, &request.bundle, &request.field_name)
        else {
            tracing::debug!(field_name = %request.field_name, "No field definition, skipping timeline");
            return Ok(Timeline::empty(field_label));
        };

        let revision_ids = self
            .source
            .list_revision_ids(request.record_id)
            .await
            .map_err(|e| timeline_load_error(request, e))?;
        if revision_ids.is_empty() {
            return Ok(Timeline::empty(field_label));
        }

        let revisions = self.load_all(request, &revision_ids).await?;

        let timeline = assemble(request, definition, field_label, &revisions, self.access.as_ref());
        tracing::debug!(
            record_id = request.record_id,
            field_name = %request.field_name,
            rows = timeline.rows.len(),
            has_collapsed_rows = timeline.has_collapsed_rows,
            "Built field timeline"
        );
        Ok(timeline)
    }

    /// Load every snapshot, a bounded number at a time, preserving order.
    async fn load_all(
        &self,
        request: &TimelineRequest,
        revision_ids: &[DbId],
    ) -> Result<Vec<Revision>, CoreError> {
        let record_id = request.record_id;
        stream::iter(revision_ids.iter().copied())
            .map(|revision_id| self.source.load_revision(record_id, revision_id))
            .buffered(self.max_concurrent_loads.max(1))
            .try_collect()
            .await
            .map_err(|e| timeline_load_error(request, e))
    }
}

fn timeline_load_error(request: &TimelineRequest, err: SourceError) -> CoreError {
    tracing::error!(
        record_id = request.record_id,
        field_name = %request.field_name,
        error = %err,
        "Failed to load revisions for field timeline"
    );
    CoreError::LoadFailure(err.to_string())
}

/// Turn chronologically ordered revisions into newest-first rows.
fn assemble(
    request: &TimelineRequest,
    definition: &FieldDefinition,
    field_label: String,
    revisions: &[Revision],
    access: &dyn RevisionAccess,
) -> Timeline {
    let accessor = FieldAccessor::new(definition);
    let latest_id = revisions.last().map(|r| r.revision_id);

    let mut rows = Vec::with_capacity(revisions.len());
    let mut previous: Option<String> = None;
    let mut has_collapsed_rows = false;

    for (index, revision) in revisions.iter().enumerate() {
        let view = revision.view_for(&request.langcode, TranslationSelection::AffectedOnly);
        let value = accessor.get(&view);
        let canonical = accessor.canonical(value);

        let unchanged = previous.as_deref() == Some(canonical.as_str());
        let is_collapsible = unchanged && !revision.is_current;
        previous = Some(canonical);

        let display = if is_collapsible {
            DisplayValue::Unchanged
        } else {
            match value {
                Some(value) if !accessor.is_empty(value) => DisplayValue::Value(value.clone()),
                _ => DisplayValue::Empty,
            }
        };
        has_collapsed_rows |= is_collapsible;

        let status = if revision.is_current {
            RevisionStatus::Current
        } else if Some(revision.revision_id) == latest_id {
            RevisionStatus::Latest
        } else {
            RevisionStatus::Historical
        };

        rows.push(TimelineRow {
            revision_id: revision.revision_id,
            display,
            is_current: revision.is_current,
            is_collapsible,
            status,
            is_created: index == 0,
            date: revision.timestamp,
            author: revision.author.clone(),
            log_message: revision.visible_log_message().map(str::to_string),
            actions: row_actions(request, revision, access),
        });
    }

    rows.reverse();
    Timeline {
        field_label,
        rows,
        has_collapsed_rows,
    }
}

fn row_actions(
    request: &TimelineRequest,
    revision: &Revision,
    access: &dyn RevisionAccess,
) -> Vec<RevisionAction> {
    let can_revert = access.can_revert(revision);
    let langcode = revision
        .is_multilingual()
        .then(|| request.langcode.clone());

    let mut actions = Vec::new();
    if can_revert || revision.is_current {
        actions.push(RevisionAction::RestoreValue(RestoreRequest::new(
            request.record_id,
            request.record_type.clone(),
            request.field_name.clone(),
            revision.revision_id,
            request.langcode.clone(),
        )));
    }
    if access.can_view(revision) {
        actions.push(RevisionAction::ViewRevision {
            record_id: request.record_id,
            revision_id: revision.revision_id,
            langcode: langcode.clone(),
        });
    }
    if can_revert {
        actions.push(RevisionAction::RevertRecord {
            record_id: request.record_id,
            revision_id: revision.revision_id,
            langcode,
        });
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::eligibility::AlwaysEnabled;
    use crate::revision::Translation;
    use crate::source::InMemoryRevisionSource;
    use crate::test_support::{
        article_schema, init_tracing, revision, text_revision, BrokenSource, CountingSource,
        TrackingDisabled, RECORD_ID,
    };
    use assert_matches::assert_matches;

    fn builder(source: InMemoryRevisionSource) -> TimelineBuilder {
        TimelineBuilder::new(Arc::new(source), Arc::new(AlwaysEnabled), Arc::new(article_schema()))
    }

    fn request(field_name: &str) -> TimelineRequest {
        TimelineRequest {
            record_id: RECORD_ID,
            record_type: "node".into(),
            bundle: "article".into(),
            field_name: field_name.into(),
            langcode: "en".into(),
        }
    }

    fn texts(values: &[&str]) -> InMemoryRevisionSource {
        let last = values.len() as DbId;
        InMemoryRevisionSource::with_revisions(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| text_revision(i as DbId + 1, "body", v, i as DbId + 1 == last)),
        )
    }

    fn ids(timeline: &Timeline) -> Vec<DbId> {
        timeline.rows.iter().map(|r| r.revision_id).collect()
    }

    #[tokio::test]
    async fn collapses_unchanged_history() {
        let timeline = builder(texts(&["Hello", "Hello", "Hello world"]))
            .build(&request("body"))
            .await
            .unwrap();

        assert_eq!(ids(&timeline), vec![3, 2, 1]);
        let [r3, r2, r1] = &timeline.rows[..] else {
            panic!("expected three rows");
        };
        assert_eq!(r3.display, DisplayValue::Value(FieldValue::text("Hello world")));
        assert!(!r3.is_collapsible);
        assert!(r3.is_current);
        assert_eq!(r2.display, DisplayValue::Unchanged);
        assert!(r2.is_collapsible);
        assert_eq!(r1.display, DisplayValue::Value(FieldValue::text("Hello")));
        assert!(!r1.is_collapsible);
        assert!(timeline.has_collapsed_rows);
    }

    #[tokio::test]
    async fn single_revision_is_always_shown() {
        let timeline = builder(texts(&["X"])).build(&request("body")).await.unwrap();

        assert_eq!(timeline.rows.len(), 1);
        let row = &timeline.rows[0];
        assert_eq!(row.display, DisplayValue::Value(FieldValue::text("X")));
        assert!(!row.is_collapsible);
        assert!(row.is_created);
        assert!(!timeline.has_collapsed_rows);
    }

    #[tokio::test]
    async fn single_non_current_revision_is_not_collapsible() {
        let source = InMemoryRevisionSource::with_revisions([text_revision(1, "body", "X", false)]);
        let timeline = builder(source).build(&request("body")).await.unwrap();
        assert!(!timeline.rows[0].is_collapsible);
        assert!(!timeline.rows[0].display.is_placeholder());
    }

    #[tokio::test]
    async fn current_row_is_pinned_even_when_unchanged() {
        let timeline = builder(texts(&["Same", "Same"])).build(&request("body")).await.unwrap();

        let current = &timeline.rows[0];
        assert!(current.is_current);
        assert!(!current.is_collapsible);
        assert_eq!(current.display, DisplayValue::Value(FieldValue::text("Same")));

        let older = &timeline.rows[1];
        assert!(!older.is_collapsible);
        assert_eq!(older.display, DisplayValue::Value(FieldValue::text("Same")));
        assert!(!timeline.has_collapsed_rows);
    }

    #[tokio::test]
    async fn collapsibility_is_not_symmetric() {
        let source = InMemoryRevisionSource::with_revisions([
            text_revision(1, "body", "A", false),
            text_revision(2, "body", "A", false),
            text_revision(3, "body", "A", true),
        ]);
        let timeline = builder(source).build(&request("body")).await.unwrap();
        let collapsible: Vec<bool> = timeline.rows.iter().map(|r| r.is_collapsible).collect();
        assert_eq!(collapsible, vec![false, true, false]);
    }

    #[tokio::test]
    async fn comparison_is_against_the_immediate_predecessor() {
        let timeline = builder(texts(&["A", "B", "A", "A", "C"]))
            .build(&request("body"))
            .await
            .unwrap();
        let placeholders: Vec<bool> = timeline.rows.iter().map(|r| r.display.is_placeholder()).collect();
        // Newest first: C, A(unchanged), A, B, A.
        assert_eq!(placeholders, vec![false, true, false, false, false]);
        assert!(timeline.has_collapsed_rows);
    }

    /// Older revisions take longer to load, so loads finish newest first.
    struct SlowOlderSource(InMemoryRevisionSource);

    #[async_trait::async_trait]
    impl RevisionSource for SlowOlderSource {
        async fn list_revision_ids(&self, record_id: DbId) -> Result<Vec<DbId>, SourceError> {
            self.0.list_revision_ids(record_id).await
        }

        async fn load_revision(&self, record_id: DbId, revision_id: DbId) -> Result<Revision, SourceError> {
            let delay = (10 - revision_id).max(0) as u64 * 5;
            tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
            self.0.load_revision(record_id, revision_id).await
        }
    }

    #[tokio::test]
    async fn out_of_order_loads_keep_chronological_rows() {
        let source = SlowOlderSource(texts(&["a", "a", "b", "b", "c", "c"]));
        let builder =
            TimelineBuilder::new(Arc::new(source), Arc::new(AlwaysEnabled), Arc::new(article_schema()))
                .with_config(&HistoryConfig {
                    max_concurrent_loads: 6,
                    ..Default::default()
                });

        let timeline = builder.build(&request("body")).await.unwrap();

        assert_eq!(ids(&timeline), vec![6, 5, 4, 3, 2, 1]);
        let collapsible: Vec<bool> = timeline.rows.iter().map(|r| r.is_collapsible).collect();
        assert_eq!(collapsible, vec![false, false, true, false, true, false]);
        assert_eq!(timeline.rows[1].display, DisplayValue::Value(FieldValue::text("c")));
        assert_eq!(timeline.rows[3].display, DisplayValue::Value(FieldValue::text("b")));
    }

    #[tokio::test]
    async fn row_count_matches_revisions_and_order_is_newest_first() {
        let timeline = builder(texts(&["a", "b", "b", "c", "c", "c", "d"]))
            .build(&request("body"))
            .await
            .unwrap();
        assert_eq!(ids(&timeline), vec![7, 6, 5, 4, 3, 2, 1]);
        assert!(timeline.rows.windows(2).all(|w| w[0].date > w[1].date));
    }

    #[tokio::test]
    async fn has_collapsed_rows_matches_non_current_collapsible_rows() {
        for values in [
            vec!["a"],
            vec!["a", "a"],
            vec!["a", "b"],
            vec!["a", "a", "b"],
            vec!["a", "b", "b", "b"],
        ] {
            let timeline = builder(texts(&values)).build(&request("body")).await.unwrap();
            let expected = timeline.rows.iter().any(|r| !r.is_current && r.is_collapsible);
            assert_eq!(timeline.has_collapsed_rows, expected, "{values:?}");
        }
    }

    #[tokio::test]
    async fn empty_and_absent_values_collapse_together() {
        let source = InMemoryRevisionSource::with_revisions([
            revision(1, &[("title", FieldValue::text("T"))], false),
            revision(2, &[("body", FieldValue::text(""))], false),
            text_revision(3, "body", "Now", true),
        ]);
        let timeline = builder(source).build(&request("body")).await.unwrap();

        assert_eq!(timeline.rows[2].display, DisplayValue::Empty);
        assert_eq!(timeline.rows[1].display, DisplayValue::Unchanged);
        assert!(timeline.rows[1].is_collapsible);
    }

    #[tokio::test]
    async fn current_empty_value_shows_empty_not_placeholder() {
        let source = InMemoryRevisionSource::with_revisions([
            revision(1, &[("body", FieldValue::empty())], false),
            revision(2, &[("body", FieldValue::empty())], true),
        ]);
        let timeline = builder(source).build(&request("body")).await.unwrap();
        assert_eq!(timeline.rows[0].display, DisplayValue::Empty);
        assert!(!timeline.rows[0].is_collapsible);
    }

    #[tokio::test]
    async fn no_revisions_is_an_empty_timeline() {
        let source = BrokenSource {
            ids: vec![],
            broken: 0,
            inner: InMemoryRevisionSource::new(),
        };
        let builder =
            TimelineBuilder::new(Arc::new(source), Arc::new(AlwaysEnabled), Arc::new(article_schema()));
        let timeline = builder.build(&request("body")).await.unwrap();
        assert!(timeline.rows.is_empty());
        assert_eq!(timeline.field_label, "Body");
    }

    #[tokio::test]
    async fn disabled_tracking_returns_empty_without_io() {
        let source = Arc::new(CountingSource::new(texts(&["a", "b"])));
        let builder = TimelineBuilder::new(source.clone(), Arc::new(TrackingDisabled), Arc::new(article_schema()));

        let timeline = builder.build(&request("body")).await.unwrap();

        assert!(timeline.rows.is_empty());
        assert!(!timeline.has_collapsed_rows);
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn unknown_field_returns_empty_with_machine_name_label() {
        let timeline = builder(texts(&["a"])).build(&request("field_gone")).await.unwrap();
        assert!(timeline.rows.is_empty());
        assert_eq!(timeline.field_label, "field_gone");
    }

    #[tokio::test]
    async fn one_unloadable_revision_fails_the_whole_timeline() {
        init_tracing();
        let source = BrokenSource {
            ids: vec![1, 2, 3],
            broken: 2,
            inner: texts(&["a", "b", "c"]),
        };
        let builder =
            TimelineBuilder::new(Arc::new(source), Arc::new(AlwaysEnabled), Arc::new(article_schema()))
                .with_config(&HistoryConfig {
                    max_concurrent_loads: 1,
                    ..Default::default()
                });

        let err = builder.build(&request("body")).await.unwrap_err();
        assert_matches!(err, CoreError::LoadFailure(_));
    }

    #[tokio::test]
    async fn unknown_record_is_a_load_failure() {
        let mut req = request("body");
        req.record_id = 404;
        let err = builder(texts(&["a"])).build(&req).await.unwrap_err();
        assert_matches!(err, CoreError::LoadFailure(msg) if msg.contains("404"));
    }

    #[tokio::test]
    async fn uses_only_affected_translations() {
        let mut r1 = text_revision(1, "body", "Hello", false);
        r1.translations.insert(
            "fr".into(),
            Translation {
                affected: true,
                fields: BTreeMap::from([("body".to_string(), FieldValue::text("Bonjour"))]),
            },
        );
        let mut r2 = text_revision(2, "body", "Hello there", true);
        r2.translations.insert(
            "fr".into(),
            Translation {
                affected: false,
                fields: BTreeMap::from([("body".to_string(), FieldValue::text("Bonjour"))]),
            },
        );
        let mut req = request("body");
        req.langcode = "fr".into();

        let timeline = builder(InMemoryRevisionSource::with_revisions([r1, r2]))
            .build(&req)
            .await
            .unwrap();

        // Revision 2 did not touch the French text, so its base value shows.
        assert_eq!(timeline.rows[0].display, DisplayValue::Value(FieldValue::text("Hello there")));
        assert_eq!(timeline.rows[1].display, DisplayValue::Value(FieldValue::text("Bonjour")));
    }

    #[tokio::test]
    async fn row_metadata() {
        let mut r1 = text_revision(1, "body", "a", false);
        r1.log_message = Some("Initial import".into());
        let mut r2 = text_revision(2, "body", "b", true);
        r2.author = None;
        r2.log_message = Some("  ".into());
        let r3 = text_revision(3, "body", "c", false);

        let timeline = builder(InMemoryRevisionSource::with_revisions([r1, r2, r3]))
            .build(&request("body"))
            .await
            .unwrap();

        let statuses: Vec<RevisionStatus> = timeline.rows.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![RevisionStatus::Latest, RevisionStatus::Current, RevisionStatus::Historical]
        );
        assert!(timeline.rows[2].is_created);
        assert!(!timeline.rows[1].is_created);
        assert_eq!(timeline.rows[2].log_message.as_deref(), Some("Initial import"));
        assert_eq!(timeline.rows[1].log_message, None);
        assert_eq!(timeline.rows[1].author, None);
        assert_eq!(timeline.field_label, "Body");
    }

    struct ViewOnly;

    impl RevisionAccess for ViewOnly {
        fn can_view(&self, _revision: &Revision) -> bool {
            true
        }

        fn can_revert(&self, _revision: &Revision) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn actions_follow_access() {
        let source = Arc::new(texts(&["a", "b"]));
        let builder = TimelineBuilder::new(source, Arc::new(AlwaysEnabled), Arc::new(article_schema()))
            .with_access(Arc::new(ViewOnly));

        let timeline = builder.build(&request("body")).await.unwrap();

        // Current row may always restore its own value.
        assert_matches!(
            timeline.rows[0].actions.as_slice(),
            [RevisionAction::RestoreValue(_), RevisionAction::ViewRevision { .. }]
        );
        assert_matches!(
            timeline.rows[1].actions.as_slice(),
            [RevisionAction::ViewRevision { revision_id: 1, langcode: None, .. }]
        );
    }

    #[tokio::test]
    async fn full_access_offers_every_action() {
        let timeline = builder(texts(&["a", "b"])).build(&request("body")).await.unwrap();
        let row = &timeline.rows[1];
        assert_eq!(row.actions.len(), 3);
        assert_eq!(
            row.actions[0],
            RevisionAction::RestoreValue(RestoreRequest::new(RECORD_ID, "node", "body", 1, "en"))
        );
        assert_matches!(row.actions[2], RevisionAction::RevertRecord { revision_id: 1, .. });
    }

    #[tokio::test]
    async fn multilingual_records_carry_langcode_on_links() {
        let mut r1 = text_revision(1, "body", "a", true);
        r1.translations.insert("fr".into(), Translation::default());
        let timeline = builder(InMemoryRevisionSource::with_revisions([r1]))
            .build(&request("body"))
            .await
            .unwrap();
        assert_matches!(
            &timeline.rows[0].actions[1],
            RevisionAction::ViewRevision { langcode: Some(code), .. } if code == "en"
        );
    }

    #[test]
    fn display_value_serializes_with_tag() {
        let json = serde_json::to_value(DisplayValue::Unchanged).unwrap();
        assert_eq!(json, serde_json::json!({"type": "unchanged"}));
        let json = serde_json::to_value(DisplayValue::Value(FieldValue::text("x"))).unwrap();
        assert_eq!(json, serde_json::json!({"type": "value", "value": [{"value": "x"}]}));
    }
}
