use std::{path::Path, str::FromStr};

use anyhow::Context;

use crate::{
    config::FormConfig,
    data::{
        field::{FieldDescriptor, FieldKind},
        tree::field_string,
    },
    form::Form,
    host::FileField,
    source::SchemaSource,
    validate::ErrorCollection,
};

/// Open the JSON document at `data` as a form over the schema at `source`.
///
/// The document is rewritten on open only when defaults were filled in.
/// With `backup` the previous file content is kept aside before the first
/// write.
///
/// # Errors
///
/// Returns errors when the schema cannot be loaded or is malformed, or when
/// the document cannot be read, parsed or written.
pub async fn open_form(
    source: &SchemaSource,
    data: impl AsRef<Path>,
    config: FormConfig,
    backup: bool,
) -> anyhow::Result<Form> {
    let data = data.as_ref();
    let schema = source
        .fetch()
        .await
        .with_context(|| format!("Failed to load schema {source}"))?;

    let mut field = FileField::new(data);
    if !backup {
        field = field.without_backup();
    }
    Form::open(&schema, field, config)
        .with_context(|| format!("Failed to open {}", data.display()))
}

/// A `path=value` edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub path: String,
    pub value: String,
}

impl FromStr for Assignment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, value) = s
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("expected `path=value`, got `{s}`"))?;
        if path.is_empty() {
            anyhow::bail!("empty field path in `{s}`");
        }
        Ok(Assignment {
            path: path.to_string(),
            value: value.to_string(),
        })
    }
}

/// Apply edits in order and return the published errors of each edited
/// field that has any.
pub fn apply(
    form: &mut Form,
    edits: &[Assignment],
) -> anyhow::Result<Vec<(String, ErrorCollection)>> {
    let mut failed = Vec::new();
    for edit in edits {
        form.edit(&edit.path, &edit.value)
            .with_context(|| format!("Failed to set `{}`", edit.path))?;
        if let Some(errors) = form.errors(&edit.path)
            && !errors.is_empty()
        {
            failed.push((edit.path.clone(), errors.clone()));
        }
    }
    Ok(failed)
}

/// Flattened view of one field for listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLine {
    pub depth: usize,
    pub path: String,
    pub title: String,
    pub kind: &'static str,
    pub required: bool,
    /// Current value; `None` for groups.
    pub value: Option<String>,
    pub options: Option<Vec<String>>,
    pub description: Option<String>,
}

/// List every field of `form` depth-first.
pub fn field_lines(form: &Form) -> Vec<FieldLine> {
    let mut lines = Vec::new();
    for field in form.fields() {
        push_lines(form, field, 0, &mut lines);
    }
    lines
}

fn push_lines(form: &Form, field: &FieldDescriptor, depth: usize, lines: &mut Vec<FieldLine>) {
    let value = (!field.is_group())
        .then(|| field.value(form.data()).map(field_string).unwrap_or_default());
    let options = match &field.kind {
        FieldKind::Select { options } => Some(options.clone()),
        _ => None,
    };
    lines.push(FieldLine {
        depth,
        path: field.path.clone(),
        title: field.title.clone(),
        kind: field.kind.name(),
        required: field.required,
        value,
        options,
        description: field.description.clone(),
    });
    for child in &field.children {
        push_lines(form, child, depth + 1, lines);
    }
}
