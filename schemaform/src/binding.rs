//! Applies user edits to the data tree.
//!
//! Raw input is converted according to the field kind and written in place
//! at the field's [`ValueRef`](crate::data::tree::ValueRef). Conversion never
//! fails: an unparsable integer input is stored as `0`.

use serde_json::Value;

use crate::data::field::{FieldDescriptor, FieldKind};

/// Convert raw widget input for a field of the given kind.
pub fn convert(kind: &FieldKind, raw: &str) -> Value {
    match kind {
        FieldKind::Integer => match raw.trim().parse::<i64>() {
            Ok(n) => Value::from(n),
            Err(_) => {
                debug!("input {raw:?} is not an integer, storing 0");
                Value::from(0)
            }
        },
        _ => Value::String(raw.to_string()),
    }
}

/// Convert `raw` and store it at the field's location in `root`.
///
/// Returns the stored value.
pub fn apply_edit(field: &FieldDescriptor, raw: &str, root: &mut Value) -> Value {
    let value = convert(&field.kind, raw);
    write(field, value.clone(), root);
    value
}

/// Store `value` as-is at the field's location in `root`.
pub fn write(field: &FieldDescriptor, value: Value, root: &mut Value) {
    trace!("{} = {}", field.path, value);
    field.value_ref.set(root, value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{compile::compile, schema::ObjectSchema};
    use serde_json::json;

    #[test]
    fn test_convert() {
        assert_eq!(convert(&FieldKind::Integer, "7"), json!(7));
        assert_eq!(convert(&FieldKind::Integer, " -12 "), json!(-12));
        assert_eq!(convert(&FieldKind::Integer, "12abc"), json!(0));
        assert_eq!(convert(&FieldKind::Integer, ""), json!(0));
        assert_eq!(convert(&FieldKind::Integer, "7.5"), json!(0));
        assert_eq!(convert(&FieldKind::Text, "12"), json!("12"));
        let select = FieldKind::Select {
            options: vec!["false".into(), "true".into()],
        };
        assert_eq!(convert(&select, "true"), json!("true"));
    }

    #[test]
    fn test_apply_edit_nested() {
        let schema = ObjectSchema::parse_root(&json!({
            "properties": {
                "a": {"type": "object", "properties": {
                    "n": {"type": "integer", "maxLength": 3}
                }}
            }
        }))
        .unwrap();
        let mut root = json!({});
        let fields = compile(&schema, &mut root);
        let n = &fields[0].children[0];

        assert_eq!(apply_edit(n, "42", &mut root), json!(42));
        assert_eq!(root, json!({"a": {"n": 42}}));

        write(n, json!(7.5), &mut root);
        assert_eq!(root["a"]["n"], json!(7.5));
    }
}
