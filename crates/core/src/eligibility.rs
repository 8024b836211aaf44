//! Which record types, bundles and fields have history tracking enabled.
//!
//! The core asks one question, [`EligibilityPolicy::is_tracking_enabled`],
//! before touching the revision store. [`SettingsEligibility`] answers it
//! from a [`HistorySettings`] document and the bundle [`Schema`].

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::schema::{FieldDefinition, Schema};

/// System fields that may be tracked even though they are base fields.
pub const AVAILABLE_SYSTEM_FIELDS: &[&str] = &["title"];

/// Fields that are never tracked.
pub const UNAVAILABLE_SYSTEM_FIELDS: &[&str] = &["comment"];

/// Decides whether history tracking is enabled for a field.
pub trait EligibilityPolicy: Send + Sync {
    fn is_tracking_enabled(&self, record_type: &str, bundle: &str, field_name: &str) -> bool;
}

/// Tracks every field.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysEnabled;

impl EligibilityPolicy for AlwaysEnabled {
    fn is_tracking_enabled(&self, _record_type: &str, _bundle: &str, _field_name: &str) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// Settings document
// ---------------------------------------------------------------------------

/// Per-bundle settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleSettings {
    #[serde(default)]
    pub enabled: bool,
    /// Machine names of the tracked fields.
    #[serde(default)]
    pub fields: Vec<String>,
}

/// The persisted settings document.
///
/// ```json
/// { "enabled": true,
///   "entity_types": { "node": { "article": { "enabled": true, "fields": ["body"] } } } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySettings {
    /// Global switch for the whole service.
    #[serde(default)]
    pub enabled: bool,
    /// `record_type -> bundle -> settings`.
    #[serde(default)]
    pub entity_types: BTreeMap<String, BTreeMap<String, BundleSettings>>,
}

impl HistorySettings {
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        serde_json::from_str(json).map_err(|e| CoreError::Config(format!("Invalid history settings: {e}")))
    }

    pub fn bundle(&self, record_type: &str, bundle: &str) -> Option<&BundleSettings> {
        self.entity_types.get(record_type)?.get(bundle)
    }

    /// Enable tracking of `fields` on a bundle, replacing its field list.
    pub fn enable_bundle<I, S>(&mut self, record_type: &str, bundle: &str, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let settings = self
            .entity_types
            .entry(record_type.to_string())
            .or_default()
            .entry(bundle.to_string())
            .or_default();
        settings.enabled = true;
        settings.fields = fields.into_iter().map(Into::into).collect();
    }
}

/// Whether a field may be offered for tracking at all, regardless of
/// settings: base fields only when allow-listed, never deny-listed ones.
pub fn is_selectable(definition: &FieldDefinition) -> bool {
    let name = definition.name.as_str();
    if definition.is_base_field && !AVAILABLE_SYSTEM_FIELDS.contains(&name) {
        return false;
    }
    !UNAVAILABLE_SYSTEM_FIELDS.contains(&name)
}

/// Fields a settings screen may offer for a bundle.
pub fn selectable_fields<'a>(
    schema: &'a Schema,
    record_type: &str,
    bundle: &str,
) -> Vec<&'a FieldDefinition> {
    schema
        .fields(record_type, bundle)
        .filter(|definition| is_selectable(definition))
        .collect()
}

// ---------------------------------------------------------------------------
// Settings-backed policy
// ---------------------------------------------------------------------------

/// Eligibility answered from [`HistorySettings`].
#[derive(Debug, Clone)]
pub struct SettingsEligibility {
    settings: HistorySettings,
    schema: Arc<Schema>,
}

impl SettingsEligibility {
    pub fn new(settings: HistorySettings, schema: Arc<Schema>) -> Self {
        Self { settings, schema }
    }

    pub fn settings(&self) -> &HistorySettings {
        &self.settings
    }
}

impl EligibilityPolicy for SettingsEligibility {
    fn is_tracking_enabled(&self, record_type: &str, bundle: &str, field_name: &str) -> bool {
        if !self.settings.enabled {
            return false;
        }
        let Some(bundle_settings) = self.settings.bundle(record_type, bundle) else {
            return false;
        };
        if !bundle_settings.enabled {
            return false;
        }
        let Some(definition) = self.schema.definition(record_type, bundle, field_name) else {
            return false;
        };
        is_selectable(definition) && bundle_settings.fields.iter().any(|f| f == field_name)
    }
}
