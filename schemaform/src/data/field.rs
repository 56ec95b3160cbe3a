use fancy_regex::Regex;
use serde_json::Value;

use crate::{data::tree::ValueRef, validate::Rule};

/// Compiled, renderable unit binding one schema property to one location
/// in the data tree.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Property name, unique within its parent.
    pub key: String,
    /// Dot-separated address of the field. Never used as a data key.
    pub path: String,
    pub kind: FieldKind,
    /// Display label.
    pub title: String,
    /// Help text.
    pub description: Option<String>,
    /// Whether the parent schema lists this key as required.
    pub required: bool,
    /// Location of the edited value.
    pub value_ref: ValueRef,
    /// Applicable rules, in evaluation order.
    pub constraints: Vec<Constraint>,
    pub max_length: Option<u64>,
    /// Child fields, non-empty only for [`FieldKind::Group`].
    pub children: Vec<FieldDescriptor>,
}

/// Widget kind, decided once at compile time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text. Long-form when the schema has no `maxLength`.
    Text,
    /// Short integer input.
    Integer,
    /// Selection over literal option strings.
    Select { options: Vec<String> },
    /// Nested object container.
    Group,
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Select { .. } => "select",
            FieldKind::Group => "group",
        }
    }
}

/// A rule bound to the data it needs for checking.
#[derive(Debug, Clone)]
pub enum Constraint {
    Required,
    OneOf(Vec<String>),
    Integer,
    Pattern(Regex),
}

impl Constraint {
    /// Identifier reported when this constraint is violated.
    pub fn rule(&self) -> Rule {
        match self {
            Constraint::Required => Rule::Required,
            Constraint::OneOf(_) => Rule::EnumMembership,
            Constraint::Integer => Rule::IntegerFormat,
            Constraint::Pattern(_) => Rule::Pattern,
        }
    }
}

impl FieldDescriptor {
    pub fn is_group(&self) -> bool {
        self.kind == FieldKind::Group
    }

    /// Text fields without `maxLength` render as multi-line areas.
    pub fn is_multiline(&self) -> bool {
        self.kind == FieldKind::Text && self.max_length.is_none()
    }

    /// Short inputs wider than 100 characters get the large style.
    pub fn is_wide(&self) -> bool {
        self.max_length.is_some_and(|n| n > 100)
    }

    /// Allowed values of a select field.
    pub fn options(&self) -> Option<&[String]> {
        match &self.kind {
            FieldKind::Select { options } => Some(options),
            _ => None,
        }
    }

    /// Rules attached to this field, in evaluation order.
    pub fn rules(&self) -> Vec<Rule> {
        self.constraints.iter().map(Constraint::rule).collect()
    }

    /// Current value in `root`.
    pub fn value<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.value_ref.get(root)
    }

    /// Depth-first iterator over this field and all of its descendants.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Find a descendant (or this field) by dotted path.
    pub fn find(&self, path: &str) -> Option<&FieldDescriptor> {
        self.walk().find(|f| f.path == path)
    }
}

/// Depth-first, pre-order traversal of a field tree.
pub struct Walk<'a> {
    stack: Vec<&'a FieldDescriptor>,
}

impl<'a> Walk<'a> {
    /// Walk a forest of top-level fields in order.
    pub fn forest(fields: &'a [FieldDescriptor]) -> Self {
        Walk {
            stack: fields.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a FieldDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        let field = self.stack.pop()?;
        self.stack.extend(field.children.iter().rev());
        Some(field)
    }
}
