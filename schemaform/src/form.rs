//! Form orchestrator.
//!
//! [`Form`] owns the data tree, the compiled field descriptors and the
//! serialized document. It compiles the schema, routes edits through
//! [`binding`](crate::binding), re-serializes after every edit and runs
//! validation when configured to.

use std::collections::HashMap;

use serde_json::Value;

use crate::{
    binding,
    config::FormConfig,
    data::{
        compile::compile,
        field::{FieldDescriptor, Walk},
        schema::{ObjectSchema, SchemaError},
        tree::{parse_document, to_document},
    },
    host::DocumentField,
    validate::{self, ErrorCollection, ValidationReport},
};

/// Errors returned by form operations.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("invalid document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("document root must be an object, got {0}")]
    DocumentNotAnObject(&'static str),
    #[error("no field at `{0}`")]
    UnknownField(String),
    #[error("field `{0}` is a group and cannot be edited")]
    NotEditable(String),
    /// Writing the host document failed. On an edit the in-memory data has
    /// already been updated.
    #[error("host document: {0}")]
    Io(#[from] std::io::Error),
}

/// A compiled form bound to its data tree.
pub struct Form {
    schema: ObjectSchema,
    fields: Vec<FieldDescriptor>,
    data: Value,
    document: String,
    config: FormConfig,
    errors: HashMap<String, ErrorCollection>,
    host: Option<Box<dyn DocumentField>>,
}

impl Form {
    /// Compile `schema` against `initial` data.
    ///
    /// The schema is parsed completely before the data is touched, so an
    /// error leaves no partial state behind.
    pub fn initialize(
        schema: &Value,
        initial: Value,
        config: FormConfig,
    ) -> Result<Self, SchemaError> {
        let schema = ObjectSchema::parse_root(schema)?;

        let mut data = initial;
        let fields = compile(&schema, &mut data);
        let document = to_document(&data);

        info!(
            "form initialized with {} fields ({} top-level)",
            schema.field_count(),
            fields.len()
        );

        let mut form = Form {
            schema,
            fields,
            data,
            document,
            config,
            errors: HashMap::new(),
            host: None,
        };

        if form.config.validate {
            form.validate_all();
        }
        Ok(form)
    }

    /// Initialize from the content of a host document field.
    ///
    /// The document is written back right away only when default filling
    /// changed the data, and after every later edit.
    pub fn open(
        schema: &Value,
        mut host: impl DocumentField + 'static,
        config: FormConfig,
    ) -> Result<Self, FormError> {
        let content = host.load()?;
        let data = parse_document(&content)?;
        let loaded = data.clone();
        let mut form = Self::initialize(schema, data, config)?;
        if form.data != loaded {
            host.store(&form.document)?;
        } else {
            debug!("no defaults filled, host document left as is");
        }
        form.host = Some(Box::new(host));
        Ok(form)
    }

    /// Apply raw user input to the field at `path`.
    ///
    /// The data tree always takes the input, valid or not. With
    /// `validate_on_change` the edited field is re-validated and its errors
    /// republished.
    ///
    /// A [`FormError::Io`] from the host field is returned after the edit
    /// has been applied: the data tree and [`current_document`] already
    /// hold the new value.
    ///
    /// [`current_document`]: Form::current_document
    pub fn edit(&mut self, path: &str, raw: &str) -> Result<(), FormError> {
        let field = editable(&self.fields, path)?;
        debug!("edit `{path}`: {raw:?}");
        binding::apply_edit(field, raw, &mut self.data);
        self.document = to_document(&self.data);
        if self.config.validate_on_change {
            let errors = validate::validate_one(field, &self.data);
            self.errors.insert(path.to_string(), errors);
        }
        self.persist()
    }

    /// Store `value` at `path` without input conversion.
    ///
    /// Host write failures are reported like in [`edit`](Form::edit).
    pub fn set_value(&mut self, path: &str, value: Value) -> Result<(), FormError> {
        let field = editable(&self.fields, path)?;
        binding::write(field, value, &mut self.data);
        self.document = to_document(&self.data);
        if self.config.validate_on_change {
            let errors = validate::validate_one(field, &self.data);
            self.errors.insert(path.to_string(), errors);
        }
        self.persist()
    }

    /// Validate a single field without publishing the result.
    pub fn validate_one(&self, path: &str) -> Result<ErrorCollection, FormError> {
        let field = self
            .field(path)
            .ok_or_else(|| FormError::UnknownField(path.to_string()))?;
        Ok(validate::validate_one(field, &self.data))
    }

    /// Validate every field and republish all error collections.
    pub fn validate_all(&mut self) -> ValidationReport {
        let report = validate::validate_all(&self.fields, &self.data);
        for (path, errors) in report.iter() {
            self.errors.insert(path.to_string(), errors.clone());
        }
        debug!("validated form: {} violations", report.error_count());
        report
    }

    /// Recompile the field tree from a new schema.
    ///
    /// Existing data is kept; missing keys are default-filled. Published
    /// errors are discarded.
    pub fn reload_schema(&mut self, schema: &Value) -> Result<(), FormError> {
        let schema = ObjectSchema::parse_root(schema)?;
        self.fields = compile(&schema, &mut self.data);
        self.schema = schema;
        self.errors.clear();
        self.document = to_document(&self.data);
        info!("schema reloaded, {} fields", self.schema.field_count());
        self.persist()
    }

    fn persist(&mut self) -> Result<(), FormError> {
        if let Some(host) = self.host.as_mut() {
            host.store(&self.document)?;
        }
        Ok(())
    }

    /// Canonical serialized data tree.
    pub fn current_document(&self) -> &str {
        &self.document
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn into_data(self) -> Value {
        self.data
    }

    /// Top-level field descriptors.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up any field by dotted path.
    pub fn field(&self, path: &str) -> Option<&FieldDescriptor> {
        Walk::forest(&self.fields).find(|f| f.path == path)
    }

    /// Errors published for `path` by the latest validation of that field.
    pub fn errors(&self, path: &str) -> Option<&ErrorCollection> {
        self.errors.get(path)
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn schema(&self) -> &ObjectSchema {
        &self.schema
    }
}

fn editable<'a>(
    fields: &'a [FieldDescriptor],
    path: &str,
) -> Result<&'a FieldDescriptor, FormError> {
    let field = Walk::forest(fields)
        .find(|f| f.path == path)
        .ok_or_else(|| FormError::UnknownField(path.to_string()))?;
    if field.is_group() {
        return Err(FormError::NotEditable(path.to_string()));
    }
    Ok(field)
}
