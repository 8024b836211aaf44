//! Locating field widgets in a rendered edit form.
//!
//! An edit form is a tree of named elements. Each field sits under its
//! machine name with a `widget` child, and the shape below the widget
//! depends on the widget type and cardinality. The functions here find
//! the element a history link should be attached to, and the input path
//! a field's submitted values live under.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::Cardinality;

/// Path of element keys from the form root.
pub type FormPath = Vec<String>;

const WIDGET: &str = "widget";
const TARGET_ID: &str = "target_id";
const VALUE: &str = "value";
const FIRST_DELTA: &str = "0";

// Element paths below the widget to try, in order.
const MULTIPLE_CANDIDATES: &[&[&str]] = &[&[TARGET_ID]];
const SINGLE_CANDIDATES: &[&[&str]] = &[
    &[FIRST_DELTA, TARGET_ID],
    &[FIRST_DELTA, VALUE],
    &[TARGET_ID],
    &[FIRST_DELTA],
];

/// Separator used when appending to an existing description.
pub const DESCRIPTION_SEPARATOR: &str = "<br />";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormElement {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, FormElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Where this element's submitted values live in the user input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parents: Option<Vec<String>>,
    /// Parents of the field within nested forms; keys widget state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_parents: Option<Vec<String>>,
}

impl FormElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_child(mut self, key: impl Into<String>, child: FormElement) -> Self {
        self.children.insert(key.into(), child);
        self
    }

    pub fn with_parents<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parents = Some(parents.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_field_parents<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field_parents = Some(parents.into_iter().map(Into::into).collect());
        self
    }

    pub fn child(&self, key: &str) -> Option<&FormElement> {
        self.children.get(key)
    }

    /// Add `text` to the description, after any existing text.
    pub fn append_description(&mut self, text: &str) {
        self.description = Some(match self.description.take() {
            Some(existing) if !existing.is_empty() => {
                format!("{existing}{DESCRIPTION_SEPARATOR}{text}")
            }
            _ => text.to_string(),
        });
    }
}

/// A rendered edit form; top-level children are keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormTree {
    root: FormElement,
}

impl FormTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, field_name: impl Into<String>, element: FormElement) -> Self {
        self.root.children.insert(field_name.into(), element);
        self
    }

    pub fn element(&self, path: &[String]) -> Option<&FormElement> {
        path.iter().try_fold(&self.root, |element, key| element.children.get(key))
    }

    pub fn element_mut(&mut self, path: &[String]) -> Option<&mut FormElement> {
        path.iter()
            .try_fold(&mut self.root, |element, key| element.children.get_mut(key))
    }

    fn widget(&self, field_name: &str) -> Option<&FormElement> {
        self.root.child(field_name)?.child(WIDGET)
    }

    /// Input path of the field's submitted values.
    ///
    /// The widget's own `parents` win, then the field element's, then the
    /// bare field name.
    pub fn widget_parents(&self, field_name: &str) -> Vec<String> {
        let field = self.root.child(field_name);
        field
            .and_then(|f| f.child(WIDGET))
            .and_then(|w| w.parents.clone())
            .or_else(|| field.and_then(|f| f.parents.clone()))
            .unwrap_or_else(|| vec![field_name.to_string()])
    }

    /// Parents of the field in nested forms, empty at the top level.
    pub fn field_parents(&self, field_name: &str) -> Vec<String> {
        self.widget(field_name)
            .and_then(|w| w.field_parents.clone())
            .unwrap_or_default()
    }
}

/// Find the element of `field_name` that should carry its description.
///
/// Returns `None` when the form has no widget for the field.
pub fn locate_description_target(
    tree: &FormTree,
    field_name: &str,
    cardinality: Cardinality,
) -> Option<FormPath> {
    let widget = tree.widget(field_name)?;
    let base = || vec![field_name.to_string(), WIDGET.to_string()];

    let candidates = if cardinality.is_multiple() {
        MULTIPLE_CANDIDATES
    } else {
        SINGLE_CANDIDATES
    };

    for candidate in candidates {
        let found = candidate
            .iter()
            .try_fold(widget, |element, key| element.child(key));
        if found.is_some() {
            let mut path = base();
            path.extend(candidate.iter().map(|k| k.to_string()));
            return Some(path);
        }
    }
    Some(base())
}

/// Append `link_html` to the description of the field's widget.
///
/// Returns the path of the annotated element, or `None` if the field has
/// no widget in this form.
pub fn annotate_history_link(
    tree: &mut FormTree,
    field_name: &str,
    cardinality: Cardinality,
    link_html: &str,
) -> Option<FormPath> {
    let path = locate_description_target(tree, field_name, cardinality)?;
    tree.element_mut(&path)?.append_description(link_html);
    Some(path)
}

/// Turn arbitrary text into a valid HTML id.
pub fn html_id(raw: &str) -> String {
    let mut id = String::with_capacity(raw.len());
    for c in raw.to_lowercase().chars() {
        let c = match c {
            ' ' | '_' | '[' => '-',
            ']' => continue,
            c if c.is_ascii_alphanumeric() || c == '-' => c,
            _ => continue,
        };
        if c == '-' && id.ends_with('-') {
            continue;
        }
        id.push(c);
    }
    id
}

/// DOM id of the region re-rendered after a field is restored.
pub fn wrapper_id(field_name: &str) -> String {
    format!("edit-{}-field-revision-history-ajax-wrapper", html_id(field_name))
}
