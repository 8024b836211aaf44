//! Field values and the per-kind field accessor.
//!
//! A field value is an ordered list of items, each item a keyed map of
//! properties (`value`, `format`, `target_id`, `alt`, ...). The core never
//! interprets a value beyond two questions, both answered by the field's
//! [`FieldKind`]: is it empty, and what is its canonical form.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::equality;
use crate::revision::RevisionView;
use crate::schema::FieldDefinition;

/// One item of a field value: a map of property name to JSON value.
pub type FieldItem = serde_json::Map<String, Value>;

// ---------------------------------------------------------------------------
// Field value
// ---------------------------------------------------------------------------

/// The value of one named field within one revision.
///
/// Derived equality is strict structural equality; use
/// [`equality::values_equal`] for the display-collapsing comparison.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldValue {
    items: Vec<FieldItem>,
}

impl FieldValue {
    pub fn new(items: Vec<FieldItem>) -> Self {
        Self { items }
    }

    /// A value with no items.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Single-item value with a `value` property.
    pub fn text(value: impl Into<String>) -> Self {
        Self::texts([value])
    }

    /// One item per string, each with a `value` property.
    pub fn texts<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            values
                .into_iter()
                .map(|v| single_property("value", Value::String(v.into())))
                .collect(),
        )
    }

    /// One item per referenced id, each with a `target_id` property.
    pub fn references<I>(target_ids: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        Self::new(
            target_ids
                .into_iter()
                .map(|id| single_property("target_id", Value::from(id)))
                .collect(),
        )
    }

    pub fn items(&self) -> &[FieldItem] {
        &self.items
    }

    /// Number of items, empty ones included.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

impl From<Vec<FieldItem>> for FieldValue {
    fn from(items: Vec<FieldItem>) -> Self {
        Self::new(items)
    }
}

fn single_property(name: &str, value: Value) -> FieldItem {
    let mut item = FieldItem::new();
    item.insert(name.to_string(), value);
    item
}

// ---------------------------------------------------------------------------
// Field kind
// ---------------------------------------------------------------------------

/// The field-type tag stored on a field definition.
///
/// Selects how emptiness and canonical form are computed. Never inferred
/// from the runtime shape of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Plain scalar text (titles, strings, numbers).
    Text,
    /// Formatted long text with an optional summary.
    RichText,
    /// Reference to another record.
    Reference,
    /// File or image attachment.
    File,
    /// Multi-value list of plain options.
    List,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::RichText => "rich_text",
            Self::Reference => "reference",
            Self::File => "file",
            Self::List => "list",
        }
    }

    /// The item properties that take part in equality.
    ///
    /// Anything else an item carries (cached labels, loaded entities,
    /// image dimensions) is ignored when classifying changes.
    pub fn significant_properties(self) -> &'static [&'static str] {
        match self {
            Self::Text | Self::List => &["value"],
            Self::RichText => &["value", "summary", "format"],
            Self::Reference => &["target_id", "target_type", "target_revision_id"],
            Self::File => &["target_id", "alt", "title", "description", "display"],
        }
    }

    /// Properties holding ids, which may arrive as numeric strings.
    pub fn id_properties(self) -> &'static [&'static str] {
        match self {
            Self::Reference => &["target_id", "target_revision_id"],
            Self::File => &["target_id"],
            Self::Text | Self::RichText | Self::List => &[],
        }
    }

    /// The property whose absence makes an item empty.
    fn main_property(self) -> &'static str {
        match self {
            Self::Text | Self::RichText | Self::List => "value",
            Self::Reference | Self::File => "target_id",
        }
    }

    pub fn item_is_empty(self, item: &FieldItem) -> bool {
        match item.get(self.main_property()) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        }
    }

    /// A value is empty when none of its items carries content.
    pub fn is_empty(self, value: &FieldValue) -> bool {
        value.items().iter().all(|item| self.item_is_empty(item))
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Accessor
// ---------------------------------------------------------------------------

/// Reads one named field out of revision views, interpreted through the
/// kind stored on its definition.
#[derive(Debug, Clone, Copy)]
pub struct FieldAccessor<'d> {
    name: &'d str,
    kind: FieldKind,
}

impl<'d> FieldAccessor<'d> {
    pub fn new(definition: &'d FieldDefinition) -> Self {
        Self::for_field(&definition.name, definition.kind)
    }

    pub fn for_field(name: &'d str, kind: FieldKind) -> Self {
        Self { name, kind }
    }

    pub fn name(&self) -> &'d str {
        self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// The field's value in `view`, or `None` when the revision does not
    /// carry the field at all.
    pub fn get<'r>(&self, view: &RevisionView<'r>) -> Option<&'r FieldValue> {
        view.field(self.name)
    }

    pub fn is_empty(&self, value: &FieldValue) -> bool {
        self.kind.is_empty(value)
    }

    /// Canonical serialization used for change classification.
    pub fn canonical(&self, value: Option<&FieldValue>) -> String {
        equality::canonical_form(self.kind, value)
    }
}
