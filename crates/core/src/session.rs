//! Pending edit-session state and the partial reset a restore triggers.
//!
//! A session holds the editor's unsaved input as a nested JSON object and
//! per-widget state (how many item rows a widget renders). Restoring a
//! field clears exactly that field's pending input so the form rebuilds it
//! from the working record; every other field keeps what the editor typed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::form::{wrapper_id, FormTree};
use crate::restore::ResetInstruction;

/// Identifies a widget across nested forms.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WidgetKey {
    pub field_parents: Vec<String>,
    pub field_name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetState {
    pub items_count: usize,
}

/// What [`EditSession::apply_reset`] changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedReset {
    /// DOM id of the region to re-render.
    pub wrapper_id: String,
    /// Input path that was cleared.
    pub input_path: Vec<String>,
    /// Whether any pending input existed at `input_path`.
    pub cleared_input: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditSession {
    #[serde(default)]
    pub user_input: Map<String, Value>,
    #[serde(default, with = "widget_state_list")]
    pub widget_states: BTreeMap<WidgetKey, WidgetState>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(user_input: Map<String, Value>) -> Self {
        Self {
            user_input,
            ..Default::default()
        }
    }

    pub fn widget_state(&self, field_parents: &[String], field_name: &str) -> Option<&WidgetState> {
        self.widget_states.get(&WidgetKey {
            field_parents: field_parents.to_vec(),
            field_name: field_name.to_string(),
        })
    }

    pub fn set_widget_state(&mut self, key: WidgetKey, state: WidgetState) {
        self.widget_states.insert(key, state);
    }

    /// Pending input at `path`, if any.
    pub fn input_at(&self, path: &[String]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(self.user_input.get(first)?, |value, key| match value {
                Value::Object(map) => map.get(key),
                Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            })
    }

    /// Drop the pending input of the restored field and resize its widget.
    pub fn apply_reset(&mut self, instruction: &ResetInstruction, form: &FormTree) -> AppliedReset {
        let field_name = instruction.field_name.as_str();
        let input_path = form.widget_parents(field_name);
        let cleared_input = remove_nested(&mut self.user_input, &input_path);

        let key = WidgetKey {
            field_parents: form.field_parents(field_name),
            field_name: field_name.to_string(),
        };
        self.widget_states.entry(key).or_default().items_count = instruction.items_count;

        tracing::debug!(
            field_name,
            items_count = instruction.items_count,
            cleared_input,
            "Reset edit session for restored field"
        );

        AppliedReset {
            wrapper_id: wrapper_id(field_name),
            input_path,
            cleared_input,
        }
    }
}

/// Remove the value at `path`. Array slots are nulled rather than removed
/// so sibling indices stay stable. Returns whether anything was there.
fn remove_nested(root: &mut Map<String, Value>, path: &[String]) -> bool {
    match path.split_first() {
        None => false,
        Some((first, [])) => root.remove(first).is_some(),
        Some((first, rest)) => root
            .get_mut(first)
            .is_some_and(|value| remove_in(value, rest)),
    }
}

fn remove_in(value: &mut Value, path: &[String]) -> bool {
    let Some((key, rest)) = path.split_first() else {
        return false;
    };
    if rest.is_empty() {
        return match value {
            Value::Object(map) => map.remove(key).is_some(),
            Value::Array(items) => match key.parse::<usize>().ok().and_then(|i| items.get_mut(i)) {
                Some(slot) => {
                    *slot = Value::Null;
                    true
                }
                None => false,
            },
            _ => false,
        };
    }
    let child = match value {
        Value::Object(map) => map.get_mut(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get_mut(i)),
        _ => None,
    };
    child.is_some_and(|child| remove_in(child, rest))
}

/// JSON object keys must be strings, so widget states travel as a list.
mod widget_state_list {
    use super::*;
    use serde::{Deserializer, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Entry {
        #[serde(flatten)]
        key: WidgetKey,
        #[serde(flatten)]
        state: WidgetState,
    }

    pub fn serialize<S: Serializer>(
        states: &BTreeMap<WidgetKey, WidgetState>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(states.iter().map(|(key, state)| Entry {
            key: key.clone(),
            state: *state,
        }))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<WidgetKey, WidgetState>, D::Error> {
        let entries = Vec::<Entry>::deserialize(deserializer)?;
        Ok(entries.into_iter().map(|e| (e.key, e.state)).collect())
    }
}
