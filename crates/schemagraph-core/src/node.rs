//! JSON-LD node construction.
//!
//! schema.org convention is that an unknown property is *absent*, never
//! `""`, `[]`, `{}` or `null`. [`Node`] enforces that at every `set`, and
//! [`prune`] applies the same law recursively to nested values.

use serde_json::{Map, Value};

/// A JSON-LD node under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    map: Map<String, Value>,
}

impl Node {
    /// Node with the given `@type` (string or array of strings).
    pub fn typed(type_name: impl Into<Value>) -> Self {
        let mut node = Self::default();
        node.set("@type", type_name);
        node
    }

    /// Node with `@type` and `@id`.
    pub fn entity(type_name: impl Into<Value>, id: impl Into<String>) -> Self {
        let mut node = Self::typed(type_name);
        node.set("@id", id.into());
        node
    }

    /// Set `key` unless the pruned value is empty.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        match prune(value.into()) {
            Some(v) => {
                self.map.insert(key.to_string(), v);
            }
            None => {
                self.map.remove(key);
            }
        }
        self
    }

    /// Builder-style [`Node::set`].
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Set `key` only when it is not already present.
    pub fn set_default(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        if !self.map.contains_key(key) {
            self.set(key, value);
        }
        self
    }

    /// First non-empty candidate wins.
    pub fn set_first<'a>(&mut self, key: &str, candidates: impl IntoIterator<Item = &'a str>) -> &mut Self {
        if let Some(v) = first_non_empty(candidates) {
            self.set(key, v);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn id(&self) -> Option<&str> {
        self.map.get("@id").and_then(Value::as_str)
    }

    /// Nodes holding nothing but `@type` carry no information.
    pub fn is_blank(&self) -> bool {
        self.map.keys().all(|k| k == "@type")
    }

    /// `None` for blank nodes so callers can `set` the result directly.
    pub fn into_option(self) -> Option<Value> {
        if self.is_blank() {
            None
        } else {
            Some(Value::Object(self.map))
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.map)
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        node.into_option().unwrap_or(Value::Null)
    }
}

/// Remove empty strings, nulls, empty containers and `@type`-only objects,
/// recursively. Returns `None` when nothing is left.
pub fn prune(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(s) => {
            if s.trim().is_empty() {
                None
            } else {
                Some(Value::String(s))
            }
        }
        Value::Array(items) => {
            let kept: Vec<Value> = items.into_iter().filter_map(prune).collect();
            if kept.is_empty() {
                None
            } else {
                Some(Value::Array(kept))
            }
        }
        Value::Object(map) => {
            let kept: Map<String, Value> = map
                .into_iter()
                .filter_map(|(k, v)| prune(v).map(|v| (k, v)))
                .collect();
            if kept.is_empty() || kept.keys().all(|k| k == "@type") {
                None
            } else {
                Some(Value::Object(kept))
            }
        }
        other => Some(other),
    }
}

/// True when `value` would be dropped by [`prune`].
pub fn is_empty_value(value: &Value) -> bool {
    prune(value.clone()).is_none()
}

/// First candidate that is not blank.
pub fn first_non_empty<'a>(candidates: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    candidates.into_iter().find(|c| !c.trim().is_empty())
}

/// A single value stays scalar, several become a list.
pub fn one_or_many(mut values: Vec<Value>) -> Value {
    match values.len() {
        0 => Value::Null,
        1 => values.remove(0),
        _ => Value::Array(values),
    }
}
