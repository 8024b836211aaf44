//! Canonical-form equality for field values.
//!
//! Two values are "equal" for collapsing purposes when their canonical
//! serializations match. The canonical form keeps only the kind's
//! significant properties, writes object keys in sorted order, writes
//! integral floats as integers, and parses numeric-string ids. It does not
//! depend on how a value was constructed or on map iteration order.
//!
//! An empty value and an absent value share the canonical form `[]`.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde_json::{Number, Value};

use crate::field::{FieldItem, FieldKind, FieldValue};

/// Largest integer an `f64` represents exactly.
const MAX_EXACT_FLOAT_INT: f64 = 9_007_199_254_740_992.0;

/// Whether `a` and `b` classify as the same value for a field of `kind`.
pub fn values_equal(kind: FieldKind, a: Option<&FieldValue>, b: Option<&FieldValue>) -> bool {
    canonical_form(kind, a) == canonical_form(kind, b)
}

/// Canonical serialization of a (possibly absent) field value.
pub fn canonical_form(kind: FieldKind, value: Option<&FieldValue>) -> String {
    let mut out = String::from("[");
    if let Some(value) = value {
        let items = value
            .items()
            .iter()
            .filter(|item| !kind.item_is_empty(item));
        for (i, item) in items.enumerate() {
            if i > 0 {
                out.push(',');
            }
            write_value(&mut out, &Value::Object(canonical_item(kind, item)));
        }
    }
    out.push(']');
    out
}

/// Project an item onto its significant properties.
///
/// Null properties are dropped so that "missing" and "explicitly null"
/// compare equal.
fn canonical_item(kind: FieldKind, item: &FieldItem) -> serde_json::Map<String, Value> {
    let mut projected = serde_json::Map::new();
    for &name in kind.significant_properties() {
        let Some(value) = item.get(name) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        let value = if kind.id_properties().contains(&name) {
            normalize_id(value)
        } else {
            value.clone()
        };
        projected.insert(name.to_string(), value);
    }
    projected
}

/// Ids sometimes arrive as `"12"` and sometimes as `12`.
fn normalize_id(value: &Value) -> Value {
    match value {
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| value.clone()),
        other => other.clone(),
    }
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&normalize_number(n)),
        // `Value`'s Display escapes the string as JSON.
        Value::String(_) => {
            let _ = write!(out, "{value}");
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let sorted: BTreeMap<&String, &Value> = map.iter().collect();
            out.push('{');
            for (i, (key, item)) in sorted.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                let _ = write!(out, "{}:", Value::String(key.clone()));
                write_value(out, item);
            }
            out.push('}');
        }
    }
}

fn normalize_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < MAX_EXACT_FLOAT_INT => {
            (f as i64).to_string()
        }
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}
