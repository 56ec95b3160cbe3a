//! Rule-based validation of field values.
//!
//! Every constraint on a field is checked independently against the value
//! currently stored in the data tree, so a field can report several
//! violations at once. Results are plain data: validation never blocks an
//! edit and never fails.

use serde_json::Value;

use crate::data::{
    field::{Constraint, FieldDescriptor, Walk},
    tree::field_string,
};

mod messages;
mod rule;

pub use messages::MessageCatalog;
pub use rule::{Rule, UnknownRule};

/// Violated rules of one field, in evaluation order.
pub type ErrorCollection = Vec<Rule>;

/// Check every constraint of `field` against its value in `root`.
///
/// Group fields carry no constraints and always yield an empty collection.
pub fn validate_one(field: &FieldDescriptor, root: &Value) -> ErrorCollection {
    let value = field.value(root).unwrap_or(&Value::Null);
    let text = field_string(value);

    field
        .constraints
        .iter()
        .filter(|c| !is_satisfied(c, value, &text))
        .map(Constraint::rule)
        .collect()
}

fn is_satisfied(constraint: &Constraint, value: &Value, text: &str) -> bool {
    match constraint {
        Constraint::Required => !text.is_empty(),
        Constraint::OneOf(options) => options.iter().any(|o| o == text),
        Constraint::Integer => is_integral(value),
        Constraint::Pattern(re) => match re.is_match(text) {
            Ok(matched) => matched,
            Err(e) => {
                warn!("pattern `{}` aborted: {e}", re.as_str());
                false
            }
        },
    }
}

/// Numeric and equal to its own floor.
///
/// Strings count as numeric when they parse as a finite number.
fn is_integral(value: &Value) -> bool {
    let n = match value {
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                return true;
            }
            n.as_f64()
        }
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.is_some_and(|n| n.is_finite() && n.floor() == n)
}

/// Validate every non-group field in `fields`, depth-first.
pub fn validate_all(fields: &[FieldDescriptor], root: &Value) -> ValidationReport {
    let entries = Walk::forest(fields)
        .filter(|f| !f.is_group())
        .map(|f| (f.path.clone(), validate_one(f, root)))
        .collect();
    ValidationReport { entries }
}

/// Outcome of a whole-form validation pass, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    entries: Vec<(String, ErrorCollection)>,
}

impl ValidationReport {
    /// Errors of the field at `path`; `None` if no such field was checked.
    pub fn get(&self, path: &str) -> Option<&ErrorCollection> {
        self.entries.iter().find(|(p, _)| p == path).map(|(_, e)| e)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ErrorCollection)> {
        self.entries.iter().map(|(p, e)| (p.as_str(), e))
    }

    /// Only the fields with at least one violation.
    pub fn invalid(&self) -> impl Iterator<Item = (&str, &ErrorCollection)> {
        self.iter().filter(|(_, e)| !e.is_empty())
    }

    pub fn is_valid(&self) -> bool {
        self.invalid().next().is_none()
    }

    /// Total number of violations across all fields.
    pub fn error_count(&self) -> usize {
        self.entries.iter().map(|(_, e)| e.len()).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for ValidationReport {
    type Item = (String, ErrorCollection);
    type IntoIter = std::vec::IntoIter<(String, ErrorCollection)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{compile::compile, schema::ObjectSchema};
    use serde_json::json;

    fn fields(schema: Value, data: &mut Value) -> Vec<FieldDescriptor> {
        compile(&ObjectSchema::parse_root(&schema).unwrap(), data)
    }

    #[test]
    fn test_required() {
        let mut data = json!({"name": ""});
        let f = fields(
            json!({"properties": {"name": {"type": "string"}}, "required": ["name"]}),
            &mut data,
        );
        assert_eq!(validate_one(&f[0], &data), vec![Rule::Required]);
        data["name"] = json!("v");
        assert!(validate_one(&f[0], &data).is_empty());
        data["name"] = Value::Null;
        assert_eq!(validate_one(&f[0], &data), vec![Rule::Required]);
    }

    #[test]
    fn test_enum_is_case_sensitive() {
        let mut data = json!({"c": "Red"});
        let f = fields(json!({"properties": {"c": {"enum": ["red", 2]}}}), &mut data);
        assert_eq!(validate_one(&f[0], &data), vec![Rule::EnumMembership]);
        data["c"] = json!(2);
        assert!(validate_one(&f[0], &data).is_empty());
    }

    #[test]
    fn test_integer_format() {
        let mut data = json!({});
        let f = fields(
            json!({"properties": {"n": {"type": "integer", "maxLength": 5}}}),
            &mut data,
        );
        for ok in [json!(7), json!(-3), json!("12"), json!(" 4 "), json!(7.0)] {
            data["n"] = ok.clone();
            assert!(validate_one(&f[0], &data).is_empty(), "{ok}");
        }
        for bad in [json!(7.5), json!("7.5"), json!("abc"), json!(""), Value::Null, json!(true)] {
            data["n"] = bad.clone();
            assert_eq!(validate_one(&f[0], &data), vec![Rule::IntegerFormat], "{bad}");
        }
    }

    #[test]
    fn test_pattern_is_unanchored() {
        let mut data = json!({"p": "abc123"});
        let f = fields(
            json!({"properties": {"p": {"type": "string", "pattern": "[0-9]+"}}}),
            &mut data,
        );
        assert!(validate_one(&f[0], &data).is_empty());
        data["p"] = json!("abc");
        assert_eq!(validate_one(&f[0], &data), vec![Rule::Pattern]);
    }

    #[test]
    fn test_lookahead_pattern() {
        let mut data = json!({"p": "abc"});
        let f = fields(
            json!({"properties": {"p": {"type": "string", "pattern": "^(?!x)"}}}),
            &mut data,
        );
        assert!(validate_one(&f[0], &data).is_empty());
        data["p"] = json!("xyz");
        assert_eq!(validate_one(&f[0], &data), vec![Rule::Pattern]);
    }

    #[test]
    fn test_multiple_violations_in_order() {
        let mut data = json!({"n": ""});
        let f = fields(
            json!({
                "properties": {"n": {"type": "integer", "maxLength": 3, "pattern": "^[0-9]"}},
                "required": ["n"]
            }),
            &mut data,
        );
        assert_eq!(
            validate_one(&f[0], &data),
            vec![Rule::Required, Rule::IntegerFormat, Rule::Pattern]
        );
    }

    #[test]
    fn test_validate_all_skips_groups() {
        let mut data = json!({});
        let f = fields(
            json!({
                "properties": {
                    "g": {"type": "object", "required": ["x"], "properties": {"x": {}}},
                    "y": {"type": "boolean", "default": true}
                },
                "required": ["g"]
            }),
            &mut data,
        );
        let report = validate_all(&f, &data);
        let paths: Vec<_> = report.iter().map(|(p, _)| p).collect();
        assert_eq!(paths, ["g.x", "y"]);
        assert_eq!(report.get("g.x"), Some(&vec![Rule::Required]));
        assert!(report.get("y").is_some_and(Vec::is_empty));
        assert_eq!(report.get("g"), None);
        assert_eq!(report.error_count(), 1);
        assert!(!report.is_valid());
        assert_eq!(report, validate_all(&f, &data));
    }
}
