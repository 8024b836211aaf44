//! Partial restore of one field's historical value into a working record.
//!
//! [`RestoreEngine::restore`] validates a [`RestoreRequest`], loads the
//! target revision, and replaces exactly one field on the caller's
//! [`WorkingRecord`]. Every other field is left alone. The returned
//! [`ResetInstruction`] tells the edit-session layer which pending input
//! to discard and how many widget items the field now needs.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::eligibility::EligibilityPolicy;
use crate::error::CoreError;
use crate::field::FieldValue;
use crate::revision::{Revision, TranslationSelection};
use crate::source::{RevisionSource, SourceError};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Request / outcome types
// ---------------------------------------------------------------------------

/// A request to restore one field from one revision.
///
/// Deserializes from the client trigger payload, which names the record
/// `entity_type` / `entity_id`. Every member is optional here so that an
/// incomplete payload is caught by validation instead of by parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreRequest {
    #[serde(default, alias = "entity_id", deserialize_with = "lenient_id")]
    pub record_id: Option<DbId>,
    #[serde(default, alias = "entity_type")]
    pub record_type: Option<String>,
    #[serde(default)]
    pub field_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub revision_id: Option<DbId>,
    /// Defaults to the working record's language.
    #[serde(default)]
    pub langcode: Option<String>,
}

impl RestoreRequest {
    /// A fully populated request.
    pub fn new(
        record_id: DbId,
        record_type: impl Into<String>,
        field_name: impl Into<String>,
        revision_id: DbId,
        langcode: impl Into<String>,
    ) -> Self {
        Self {
            record_id: Some(record_id),
            record_type: Some(record_type.into()),
            field_name: Some(field_name.into()),
            revision_id: Some(revision_id),
            langcode: Some(langcode.into()),
        }
    }

    /// Parse a trigger payload. Malformed JSON yields an empty request,
    /// which [`RestoreEngine::restore`] rejects as invalid.
    pub fn from_payload(payload: &str) -> Self {
        if payload.trim().is_empty() {
            return Self::default();
        }
        serde_json::from_str(payload).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Malformed restore payload");
            Self::default()
        })
    }
}

/// Ids arrive either as JSON numbers or as numeric strings (`"12"`).
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<DbId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(DbId),
        Text(String),
    }

    match Option::<RawId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawId::Number(id)) => Ok(Some(id)),
        Some(RawId::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(RawId::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid id '{text}'"))),
    }
}

/// An in-progress, unsaved copy of a record.
///
/// The record declares exactly the fields present in `fields`; an empty
/// value still counts as declared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingRecord {
    pub record_id: DbId,
    pub record_type: String,
    pub bundle: String,
    pub langcode: String,
    pub fields: BTreeMap<String, FieldValue>,
}

impl WorkingRecord {
    /// Editable copy of a revision in the given language.
    pub fn from_revision(revision: &Revision, langcode: &str) -> Self {
        let view = revision.view_for(langcode, TranslationSelection::Any);
        let mut fields = revision.fields.clone();
        for (name, value) in fields.iter_mut() {
            if let Some(translated) = view.field(name) {
                *value = translated.clone();
            }
        }
        Self {
            record_id: revision.record_id,
            record_type: revision.record_type.clone(),
            bundle: revision.bundle.clone(),
            langcode: view.langcode().to_string(),
            fields,
        }
    }

    pub fn declares(&self, field_name: &str) -> bool {
        self.fields.contains_key(field_name)
    }

    pub fn field(&self, field_name: &str) -> Option<&FieldValue> {
        self.fields.get(field_name)
    }
}

/// What the edit-session layer must invalidate after a restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetInstruction {
    /// The field whose pending input is discarded.
    pub field_name: String,
    /// Number of items the restored value holds; the field's widget is
    /// resized to match.
    pub items_count: usize,
}

/// Successful outcomes of a restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The value was written onto the working record.
    Applied(ResetInstruction),
    /// The field does not exist on the record or on the revision; nothing
    /// was changed.
    NotApplicable,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Restores single field values from revision history.
pub struct RestoreEngine {
    source: Arc<dyn RevisionSource>,
    policy: Arc<dyn EligibilityPolicy>,
}

impl RestoreEngine {
    pub fn new(source: Arc<dyn RevisionSource>, policy: Arc<dyn EligibilityPolicy>) -> Self {
        Self { source, policy }
    }

    /// Restore `request.field_name` from `request.revision_id` onto
    /// `working`.
    ///
    /// Checks run in order and the first failure wins: missing field name
    /// or revision id, record mismatch, tracking disabled (all
    /// [`CoreError::InvalidRequest`], no I/O), revision lookup
    /// ([`CoreError::RevisionNotFound`] / [`CoreError::LoadFailure`]), then
    /// field presence ([`RestoreOutcome::NotApplicable`]).
    ///
    /// `working` is only modified on [`RestoreOutcome::Applied`], and then
    /// only in `request.field_name`.
    pub async fn restore(
        &self,
        working: &mut WorkingRecord,
        request: &RestoreRequest,
    ) -> Result<RestoreOutcome, CoreError> {
        let (field_name, revision_id) = match self.validate(working, request) {
            Ok(target) => target,
            Err(e) => {
                tracing::debug!(record_id = working.record_id, error = %e, "Rejected restore request");
                return Err(e);
            }
        };

        let revision = self
            .source
            .load_revision(working.record_id, revision_id)
            .await
            .map_err(|e| load_error(working.record_id, revision_id, e))?;

        let langcode = request.langcode.as_deref().unwrap_or(&working.langcode);
        let view = revision.view_for(langcode, TranslationSelection::Any);

        let value = match view.field(field_name) {
            Some(value) if working.declares(field_name) => value.clone(),
            _ => {
                tracing::debug!(
                    record_id = working.record_id,
                    revision_id,
                    field_name,
                    "Field not applicable to restore"
                );
                return Ok(RestoreOutcome::NotApplicable);
            }
        };

        let items_count = value.item_count();
        working.fields.insert(field_name.to_string(), value);

        tracing::info!(
            record_id = working.record_id,
            revision_id,
            field_name,
            langcode = view.langcode(),
            items_count,
            "Restored field value from revision"
        );

        Ok(RestoreOutcome::Applied(ResetInstruction {
            field_name: field_name.to_string(),
            items_count,
        }))
    }

    /// Request checks that need no I/O.
    fn validate<'r>(
        &self,
        working: &WorkingRecord,
        request: &'r RestoreRequest,
    ) -> Result<(&'r str, DbId), CoreError> {
        let field_name = request
            .field_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| CoreError::InvalidRequest("field_name is required".into()))?;
        let revision_id = request
            .revision_id
            .filter(|id| *id > 0)
            .ok_or_else(|| CoreError::InvalidRequest("revision_id is required".into()))?;

        if let Some(record_id) = request.record_id {
            if record_id != working.record_id {
                return Err(CoreError::InvalidRequest(format!(
                    "Request targets record {record_id} but the working record is {}",
                    working.record_id
                )));
            }
        }
        if let Some(record_type) = request.record_type.as_deref() {
            if record_type != working.record_type {
                return Err(CoreError::InvalidRequest(format!(
                    "Request targets record type '{record_type}' but the working record is '{}'",
                    working.record_type
                )));
            }
        }

        if !self
            .policy
            .is_tracking_enabled(&working.record_type, &working.bundle, field_name)
        {
            return Err(CoreError::InvalidRequest(format!(
                "History tracking is disabled for {}.{}.{field_name}",
                working.record_type, working.bundle
            )));
        }

        Ok((field_name, revision_id))
    }
}

fn load_error(record_id: DbId, revision_id: DbId, err: SourceError) -> CoreError {
    match err {
        SourceError::NotFound { .. } => {
            tracing::info!(record_id, revision_id, "Restore target revision not found");
            CoreError::RevisionNotFound {
                record_id,
                revision_id,
            }
        }
        SourceError::Backend(msg) => {
            tracing::error!(record_id, revision_id, error = %msg, "Failed to load restore target revision");
            CoreError::LoadFailure(msg)
        }
    }
}
