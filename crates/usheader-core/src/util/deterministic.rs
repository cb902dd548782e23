//! Deterministic ordering helpers.
//!
//! Header output must be byte-identical for identical inputs. Equality
//! and ordering of multi-value tags are therefore defined on a canonical
//! text form instead of on in-memory identity.
//!
//! The canonical form of a structured value is its compact JSON encoding
//! with object keys in insertion order. Two objects holding the same
//! entries in a different key order are distinct.

use std::collections::HashSet;

use serde_json::Value;

/// Canonical JSON encoding of a value.
pub fn canonical_json(value: &Value) -> String {
    value.to_string()
}

/// Text used for a value on a header line and as its sort key.
///
/// Strings appear verbatim; every other value uses its canonical JSON.
pub fn display_form(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => canonical_json(other),
    }
}

/// Remove structural duplicates, keeping the first occurrence.
///
/// `null` entries are dropped as absent values.
pub fn dedupe_structural(values: &[Value]) -> Vec<Value> {
    let mut seen = HashSet::new();

    values
        .iter()
        .filter(|v| !v.is_null())
        .filter(|v| seen.insert(canonical_json(v)))
        .cloned()
        .collect()
}

/// Sort values by their display form (byte-wise).
pub fn sort_by_display(values: &mut [Value]) {
    values.sort_by_cached_key(display_form);
}
