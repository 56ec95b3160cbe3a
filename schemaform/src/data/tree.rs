//! The live data tree and its canonical serialization.

use serde::Serialize;
use serde_json::{Map, Value, ser::PrettyFormatter};

use crate::form::FormError;

/// Location of a value inside the data tree.
///
/// `parent` lists the keys leading from the root to the owning mapping;
/// `key` is the entry edited inside that mapping. Resolution always starts
/// from the root, so writes to nested leaves are visible in the root
/// immediately.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValueRef {
    pub parent: Vec<String>,
    pub key: String,
}

impl ValueRef {
    pub fn new(parent: Vec<String>, key: impl Into<String>) -> Self {
        Self {
            parent,
            key: key.into(),
        }
    }

    /// Read the referenced value, if present.
    pub fn get<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        let mut node = root;
        for seg in &self.parent {
            node = node.as_object()?.get(seg)?;
        }
        node.as_object()?.get(&self.key)
    }

    /// Write `value` at this location, creating missing intermediate
    /// mappings along the way.
    pub fn set(&self, root: &mut Value, value: Value) {
        let mut node = ensure_object(root);
        for seg in &self.parent {
            let child = node
                .entry(seg.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            node = ensure_object(child);
        }
        node.insert(self.key.clone(), value);
    }

    /// Dotted path of this location.
    pub fn path(&self) -> String {
        let mut parts = self.parent.clone();
        parts.push(self.key.clone());
        parts.join(".")
    }
}

/// Coerce `value` into a mapping, replacing any scalar, and return it.
pub(crate) fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just replaced by an object"),
    }
}

/// String form of a stored value, as presented in a field.
///
/// `null` (an unset placeholder) reads as the empty string.
pub fn field_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Serialize the data tree as pretty JSON indented by one space per level.
pub fn to_document(root: &Value) -> String {
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b" "));
    // Serializing a `Value` into memory cannot fail.
    if root.serialize(&mut ser).is_err() {
        return root.to_string();
    }
    String::from_utf8(buf).unwrap_or_else(|_| root.to_string())
}

/// Parse the host document into a data tree.
///
/// Blank input and a literal `null` both yield an empty mapping.
pub fn parse_document(content: &str) -> Result<Value, FormError> {
    if content.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    match serde_json::from_str::<Value>(content)? {
        Value::Null => Ok(Value::Object(Map::new())),
        v @ Value::Object(_) => Ok(v),
        other => Err(FormError::DocumentNotAnObject(type_name(&other))),
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
