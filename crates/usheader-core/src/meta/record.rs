use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Resolved userscript metadata.
///
/// An insertion-ordered mapping from tag name to JSON value. Built once
/// per artifact by `meta::resolve` and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataRecord {
    fields: Map<String, Value>,
}

impl MetadataRecord {
    pub(crate) fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// True when the field holds a non-null value.
    pub fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_null())
    }

    /// Fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Grant tokens, in merge order.
    pub fn grants(&self) -> Vec<&str> {
        match self.get("grant") {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            Some(Value::String(s)) => vec![s.as_str()],
            _ => vec![],
        }
    }

    /// Insert or overwrite a field, keeping the original position of an
    /// existing key.
    pub(crate) fn set(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }
}

/// Typed view of one metadata value, selecting how it is rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue<'a> {
    /// `null`: the tag is omitted.
    Absent,
    /// Bare tag. Emitted whenever set, `false` included.
    Flag(bool),
    /// Single-value tag. Numbers render as their JSON text.
    Text(String),
    /// One line per element.
    List(&'a [Value]),
    /// Name → URL pairs; only meaningful for `resource`.
    Map(&'a Map<String, Value>),
}

impl<'a> From<&'a Value> for MetaValue<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Null => MetaValue::Absent,
            Value::Bool(b) => MetaValue::Flag(*b),
            Value::String(s) => MetaValue::Text(s.clone()),
            Value::Number(n) => MetaValue::Text(n.to_string()),
            Value::Array(items) => MetaValue::List(items),
            Value::Object(map) => MetaValue::Map(map),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> MetadataRecord {
        match value {
            Value::Object(map) => MetadataRecord::from_map(map),
            _ => panic!("record fixture must be an object"),
        }
    }

    #[test]
    fn set_keeps_position_of_existing_key() {
        let mut r = record(json!({ "a": 1, "b": 2, "c": 3 }));
        r.set("a", json!(10));
        r.set("d", json!(4));

        let keys: Vec<&str> = r.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b", "c", "d"]);
        assert_eq!(r.get("a"), Some(&json!(10)));
    }

    #[test]
    fn null_is_not_set() {
        let r = record(json!({ "a": null, "b": false }));

        assert!(!r.is_set("a"));
        assert!(r.is_set("b"));
        assert!(!r.is_set("missing"));
    }

    #[test]
    fn grants_reads_string_entries() {
        let r = record(json!({ "grant": ["none", "GM.setValue"] }));
        assert_eq!(r.grants(), vec!["none", "GM.setValue"]);

        assert!(MetadataRecord::default().grants().is_empty());
    }

    #[test]
    fn value_view_is_type_directed() {
        assert_eq!(MetaValue::from(&json!(null)), MetaValue::Absent);
        assert_eq!(MetaValue::from(&json!(false)), MetaValue::Flag(false));
        assert_eq!(MetaValue::from(&json!("x")), MetaValue::Text("x".into()));
        assert_eq!(MetaValue::from(&json!(1.5)), MetaValue::Text("1.5".into()));

        let list = json!(["a"]);
        assert!(matches!(MetaValue::from(&list), MetaValue::List(items) if items.len() == 1));

        let map = json!({ "css": "style.css" });
        assert!(matches!(MetaValue::from(&map), MetaValue::Map(m) if m.contains_key("css")));
    }

    #[test]
    fn serializes_as_plain_object_in_insertion_order() {
        let r = record(json!({ "zeta": 1, "alpha": 2 }));
        assert_eq!(serde_json::to_string(&r).unwrap(), r#"{"zeta":1,"alpha":2}"#);
    }
}
