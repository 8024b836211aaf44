//! Field definitions per record type and bundle.
//!
//! The schema is where the [`FieldKind`] tag lives; the timeline builder
//! and eligibility settings look fields up here rather than inspecting
//! values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::field::FieldKind;

/// How many items a field may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    Limited(u32),
    Unlimited,
}

impl Cardinality {
    /// Multi-valued fields render one widget per item.
    pub fn is_multiple(self) -> bool {
        match self {
            Self::Unlimited => true,
            Self::Limited(n) => n > 1,
        }
    }
}

impl Default for Cardinality {
    fn default() -> Self {
        Self::Limited(1)
    }
}

/// Definition of a single field on a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Machine name, the key in revision field maps.
    pub name: String,
    /// Human-readable label.
    pub label: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub cardinality: Cardinality,
    /// System field shared by every bundle (title, author, revision log...).
    #[serde(default)]
    pub is_base_field: bool,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            cardinality: Cardinality::default(),
            is_base_field: false,
        }
    }

    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    pub fn base_field(mut self) -> Self {
        self.is_base_field = true;
        self
    }
}

/// Field definitions for every record type and bundle, keyed
/// `record_type -> bundle -> field name`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    bundles: BTreeMap<String, BTreeMap<String, BTreeMap<String, FieldDefinition>>>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a field, replacing any earlier definition of the same name.
    pub fn add_field(&mut self, record_type: &str, bundle: &str, definition: FieldDefinition) {
        self.bundles
            .entry(record_type.to_string())
            .or_default()
            .entry(bundle.to_string())
            .or_default()
            .insert(definition.name.clone(), definition);
    }

    pub fn with_field(mut self, record_type: &str, bundle: &str, definition: FieldDefinition) -> Self {
        self.add_field(record_type, bundle, definition);
        self
    }

    pub fn definition(&self, record_type: &str, bundle: &str, field_name: &str) -> Option<&FieldDefinition> {
        self.bundles.get(record_type)?.get(bundle)?.get(field_name)
    }

    /// All fields of a bundle, ordered by machine name.
    pub fn fields(&self, record_type: &str, bundle: &str) -> impl Iterator<Item = &FieldDefinition> {
        self.bundles
            .get(record_type)
            .and_then(|bundles| bundles.get(bundle))
            .into_iter()
            .flat_map(|fields| fields.values())
    }

    /// Label for display, or the machine name when the field is unknown.
    pub fn field_label(&self, record_type: &str, bundle: &str, field_name: &str) -> String {
        self.definition(record_type, bundle, field_name)
            .map(|d| d.label.clone())
            .unwrap_or_else(|| field_name.to_string())
    }
}
