//! Schema model parsed from a JSON Schema-like document.
//!
//! Only a small vocabulary is interpreted: `type`, `title`, `description`,
//! `default`, `enum`, `maxLength`, `pattern`, `properties` and `required`.
//! Every other keyword is ignored.
//!
//! Patterns are compiled with [`fancy_regex`], which accepts look-around and
//! backreferences like ECMAScript expressions do. A pattern that still
//! fails to compile, or a `maxLength` that is not a number, is dropped with
//! a warning instead of failing the whole schema.

use std::collections::{BTreeSet, HashSet};

use fancy_regex::Regex;
use serde_json::{Map, Value};

/// Errors raised while loading or parsing a schema.
///
/// Any of these is fatal to form initialization.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The schema (or a nested object schema) is not a JSON object.
    #[error("schema at `{path}` is not an object")]
    NotAnObject { path: String },
    /// An object schema has no `properties` member.
    #[error("schema at `{path}` has no `properties`")]
    MissingProperties { path: String },
    /// A keyword holds a value of the wrong JSON type.
    #[error("type mismatch at `{path}`: expected {expected}, got {actual}")]
    TypeMismatch {
        path: String,
        expected: String,
        actual: String,
    },
    /// Two fields resolve to the same dotted path, e.g. a top-level
    /// `"a.b"` next to `a` → `b`.
    #[error("duplicate field path `{path}`")]
    DuplicatePath { path: String },
    /// The schema document could not be retrieved.
    #[error("failed to fetch schema from {location}: {reason}")]
    Fetch { location: String, reason: String },
    /// The schema document is not valid JSON.
    #[error("failed to parse schema: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Declared `type` of a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaType {
    String,
    Integer,
    Boolean,
    Object,
    /// Anything else, including a missing `type`. Edited as text.
    Other(String),
}

impl SchemaType {
    fn from_keyword(s: Option<&str>) -> Self {
        match s {
            Some("string") => SchemaType::String,
            Some("integer") => SchemaType::Integer,
            Some("boolean") => SchemaType::Boolean,
            Some("object") => SchemaType::Object,
            Some(other) => SchemaType::Other(other.to_string()),
            None => SchemaType::Other(String::new()),
        }
    }
}

/// Schema of an `object` node: its child properties and required keys.
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    /// Child properties, in document order.
    pub properties: Vec<(String, PropertySchema)>,
    /// Keys whose values must be non-empty.
    pub required: BTreeSet<String>,
}

/// Schema of a single property.
#[derive(Debug, Clone)]
pub struct PropertySchema {
    pub schema_type: SchemaType,
    /// Display label. Falls back to the property key.
    pub title: String,
    pub description: Option<String>,
    /// Used only when the data tree lacks a value for this key.
    pub default: Option<Value>,
    /// Allowed literal values, in declaration order.
    pub enum_values: Option<Vec<Value>>,
    pub max_length: Option<u64>,
    pub pattern: Option<Regex>,
    /// Present exactly when `schema_type` is [`SchemaType::Object`].
    pub object: Option<ObjectSchema>,
}

impl ObjectSchema {
    /// Parse the root of a schema document.
    ///
    /// The root must be a JSON object with a `properties` member; its
    /// `type` keyword is not checked. Every field must have a distinct
    /// dotted path.
    pub fn parse_root(schema: &Value) -> Result<Self, SchemaError> {
        let obj = schema.as_object().ok_or_else(|| SchemaError::NotAnObject {
            path: String::new(),
        })?;
        let root = Self::parse(obj, "")?;
        root.check_paths("", &mut HashSet::new())?;
        Ok(root)
    }

    fn check_paths(&self, prefix: &str, seen: &mut HashSet<String>) -> Result<(), SchemaError> {
        for (key, prop) in &self.properties {
            let path = join(prefix, key);
            if !seen.insert(path.clone()) {
                return Err(SchemaError::DuplicatePath { path });
            }
            if let Some(object) = &prop.object {
                object.check_paths(&path, seen)?;
            }
        }
        Ok(())
    }

    fn parse(obj: &Map<String, Value>, path: &str) -> Result<Self, SchemaError> {
        let props = match obj.get("properties") {
            Some(Value::Object(props)) => props,
            Some(other) => {
                return Err(SchemaError::TypeMismatch {
                    path: join(path, "properties"),
                    expected: "object".to_string(),
                    actual: other.to_string(),
                });
            }
            None => {
                return Err(SchemaError::MissingProperties {
                    path: path.to_string(),
                });
            }
        };

        let required = match obj.get("required") {
            None | Some(Value::Null) => BTreeSet::new(),
            Some(Value::Array(keys)) => keys
                .iter()
                .filter_map(|k| k.as_str().map(str::to_string))
                .collect(),
            Some(other) => {
                return Err(SchemaError::TypeMismatch {
                    path: join(path, "required"),
                    expected: "array of strings".to_string(),
                    actual: other.to_string(),
                });
            }
        };

        let mut properties = Vec::with_capacity(props.len());
        for (key, prop) in props {
            let prop_path = join(path, key);
            properties.push((key.clone(), PropertySchema::parse(key, prop, &prop_path)?));
        }

        Ok(ObjectSchema {
            properties,
            required,
        })
    }

    /// Whether `key` is listed in `required`.
    pub fn is_required(&self, key: &str) -> bool {
        self.required.contains(key)
    }

    /// Total number of properties in this subtree, groups included.
    pub fn field_count(&self) -> usize {
        self.properties
            .iter()
            .map(|(_, p)| 1 + p.object.as_ref().map_or(0, ObjectSchema::field_count))
            .sum()
    }
}

impl PropertySchema {
    fn parse(key: &str, value: &Value, path: &str) -> Result<Self, SchemaError> {
        let obj = value.as_object().ok_or_else(|| SchemaError::NotAnObject {
            path: path.to_string(),
        })?;

        let schema_type = SchemaType::from_keyword(obj.get("type").and_then(Value::as_str));

        let title = obj
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or(key)
            .to_string();
        let description = obj
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string);

        let enum_values = match obj.get("enum") {
            None | Some(Value::Null) => None,
            Some(Value::Array(values)) => Some(values.clone()),
            Some(other) => {
                return Err(SchemaError::TypeMismatch {
                    path: join(path, "enum"),
                    expected: "array".to_string(),
                    actual: other.to_string(),
                });
            }
        };

        let max_length = obj
            .get("maxLength")
            .and_then(|v| parse_max_length(v, path));

        let pattern = match obj.get("pattern").and_then(Value::as_str) {
            Some(p) => match Regex::new(p) {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!("ignoring pattern at `{path}`: {e}");
                    None
                }
            },
            None => None,
        };

        let object = if schema_type == SchemaType::Object {
            Some(ObjectSchema::parse(obj, path)?)
        } else {
            None
        };

        Ok(PropertySchema {
            schema_type,
            title,
            description,
            default: obj.get("default").cloned(),
            enum_values,
            max_length,
            pattern,
            object,
        })
    }
}

/// Any positive number, or a string holding one. Zero means unset.
fn parse_max_length(value: &Value, path: &str) -> Option<u64> {
    let n = match value {
        Value::Null => return None,
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match n {
        Some(n) if n.is_finite() => (n > 0.0).then(|| n.ceil() as u64),
        _ => {
            warn!("ignoring maxLength at `{path}`: {value}");
            None
        }
    }
}

/// Join a dotted path prefix and a key.
pub(crate) fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}
