//! Field compiler: turns an object schema plus a data tree into a tree of
//! field descriptors, default-filling the data tree on the way.

use serde_json::{Map, Value};

use crate::data::{
    field::{Constraint, FieldDescriptor, FieldKind},
    schema::{ObjectSchema, PropertySchema, SchemaType, join},
    tree::{ValueRef, ensure_object, field_string},
};

/// Option strings of a boolean select.
pub const BOOLEAN_OPTIONS: [&str; 2] = ["false", "true"];

/// Compile every property of `schema` against the `data` mapping.
///
/// A non-object `data` is replaced by an empty mapping first.
pub fn compile(schema: &ObjectSchema, data: &mut Value) -> Vec<FieldDescriptor> {
    compile_object(schema, ensure_object(data), &[])
}

fn compile_object(
    schema: &ObjectSchema,
    data: &mut Map<String, Value>,
    parent: &[String],
) -> Vec<FieldDescriptor> {
    schema
        .properties
        .iter()
        .map(|(key, prop)| compile_property(key, prop, data, parent, schema.is_required(key)))
        .collect()
}

/// Compile a single property whose owning mapping is `data`.
///
/// `parent` holds the keys leading from the root to `data`.
pub fn compile_property(
    key: &str,
    prop: &PropertySchema,
    data: &mut Map<String, Value>,
    parent: &[String],
    required: bool,
) -> FieldDescriptor {
    let missing = data.get(key).is_none_or(Value::is_null);
    if missing {
        data.insert(key.to_string(), prop.default.clone().unwrap_or(Value::Null));
    }

    let path = join(&parent.join("."), key);
    let value_ref = ValueRef::new(parent.to_vec(), key);

    let (kind, children) = match (&prop.object, &prop.enum_values, &prop.schema_type) {
        (Some(object), _, _) => {
            let mut child_parent = parent.to_vec();
            child_parent.push(key.to_string());
            // `key` was filled above, so the slot always exists.
            let slot = data
                .entry(key.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            let children = compile_object(object, ensure_object(slot), &child_parent);
            (FieldKind::Group, children)
        }
        (None, Some(values), _) => (
            FieldKind::Select {
                options: values.iter().map(field_string).collect(),
            },
            Vec::new(),
        ),
        (None, None, SchemaType::Boolean) => (
            FieldKind::Select {
                options: BOOLEAN_OPTIONS.iter().map(|s| s.to_string()).collect(),
            },
            Vec::new(),
        ),
        (None, None, SchemaType::Integer) if prop.max_length.is_some() => {
            (FieldKind::Integer, Vec::new())
        }
        _ => (FieldKind::Text, Vec::new()),
    };

    let constraints = constraints_for(&kind, prop, required);

    debug!("compiled field `{path}` as {}", kind.name());

    FieldDescriptor {
        key: key.to_string(),
        path,
        kind,
        title: prop.title.clone(),
        description: prop.description.clone(),
        required,
        value_ref,
        constraints,
        max_length: prop.max_length,
        children,
    }
}

fn constraints_for(kind: &FieldKind, prop: &PropertySchema, required: bool) -> Vec<Constraint> {
    let mut constraints = Vec::new();
    if *kind == FieldKind::Group {
        return constraints;
    }
    if required {
        constraints.push(Constraint::Required);
    }
    if let FieldKind::Select { options } = kind {
        constraints.push(Constraint::OneOf(options.clone()));
    }
    if *kind == FieldKind::Integer {
        constraints.push(Constraint::Integer);
    }
    if matches!(kind, FieldKind::Text | FieldKind::Integer)
        && let Some(pattern) = &prop.pattern
    {
        constraints.push(Constraint::Pattern(pattern.clone()));
    }
    constraints
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::Rule;
    use serde_json::json;

    fn schema(v: Value) -> ObjectSchema {
        ObjectSchema::parse_root(&v).unwrap()
    }

    #[test]
    fn test_default_fill() {
        let s = schema(json!({
            "properties": {
                "a": {"type": "string", "default": "x"},
                "b": {"type": "string", "default": "y"},
                "c": {"type": "string"}
            }
        }));
        let mut data = json!({"b": "kept"});
        compile(&s, &mut data);
        assert_eq!(data, json!({"b": "kept", "a": "x", "c": null}));
    }

    #[test]
    fn test_null_is_default_filled() {
        let s = schema(json!({"properties": {"a": {"default": 3}}}));
        let mut data = json!({"a": null});
        compile(&s, &mut data);
        assert_eq!(data["a"], json!(3));
    }

    #[test]
    fn test_kind_dispatch() {
        let s = schema(json!({
            "properties": {
                "obj": {"type": "object", "properties": {}, "enum": ["x"]},
                "choice": {"type": "boolean", "enum": ["a", 1]},
                "flag": {"type": "boolean"},
                "short_int": {"type": "integer", "maxLength": 5},
                "long_int": {"type": "integer"},
                "short_text": {"type": "string", "maxLength": 5},
                "other": {"type": "number", "maxLength": 5}
            }
        }));
        let mut data = json!({});
        let fields = compile(&s, &mut data);
        let kinds: Vec<_> = fields.iter().map(|f| f.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                FieldKind::Group,
                FieldKind::Select {
                    options: vec!["a".into(), "1".into()]
                },
                FieldKind::Select {
                    options: vec!["false".into(), "true".into()]
                },
                FieldKind::Integer,
                FieldKind::Text,
                FieldKind::Text,
                FieldKind::Text,
            ]
        );
    }

    #[test]
    fn test_rule_sets() {
        let s = schema(json!({
            "properties": {
                "n": {"type": "integer", "maxLength": 4, "pattern": "^1"},
                "long_n": {"type": "integer", "pattern": "^1"},
                "e": {"enum": ["a"], "pattern": "^a"},
                "g": {"type": "object", "properties": {}}
            },
            "required": ["n", "e", "g"]
        }));
        let mut data = json!({});
        let fields = compile(&s, &mut data);
        assert_eq!(
            fields[0].rules(),
            vec![Rule::Required, Rule::IntegerFormat, Rule::Pattern]
        );
        assert_eq!(fields[1].rules(), vec![Rule::Pattern]);
        assert_eq!(fields[2].rules(), vec![Rule::Required, Rule::EnumMembership]);
        assert!(fields[3].required);
        assert!(fields[3].rules().is_empty());
    }

    #[test]
    fn test_nested_group() {
        let s = schema(json!({
            "properties": {
                "a": {
                    "type": "object",
                    "required": ["b"],
                    "properties": {
                        "b": {"type": "string", "default": "x"},
                        "c": {"type": "object", "properties": {"d": {}}}
                    }
                }
            }
        }));
        let mut data = json!({"a": "not an object"});
        let fields = compile(&s, &mut data);
        assert_eq!(data, json!({"a": {"b": "x", "c": {"d": null}}}));

        let a = &fields[0];
        assert!(a.is_group());
        assert_eq!(a.children.len(), 2);
        assert_eq!(a.children[0].path, "a.b");
        assert!(a.children[0].required);
        assert_eq!(a.children[1].children[0].path, "a.c.d");
        assert_eq!(
            a.children[1].children[0].value_ref,
            ValueRef::new(vec!["a".into(), "c".into()], "d")
        );
    }

    #[test]
    fn test_object_default_is_used() {
        let s = schema(json!({
            "properties": {
                "a": {
                    "type": "object",
                    "default": {"b": "from default"},
                    "properties": {"b": {"type": "string"}}
                }
            }
        }));
        let mut data = json!({});
        compile(&s, &mut data);
        assert_eq!(data, json!({"a": {"b": "from default"}}));
    }
}
