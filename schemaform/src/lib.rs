//! # schemaform
//!
//! Schema-driven form compiler, data binding and validation for JSON
//! documents.
//!
//! Given a JSON Schema-like description and a JSON data object, schemaform
//! compiles one editable field per schema property (recursing into nested
//! objects), keeps every field bound to its location in the data tree, and
//! validates field values against a small fixed rule set.
//!
//! ## Features
//!
//! - Field kinds decided once at compile time: text, integer, select, group
//! - Default values filled into the data tree for missing keys
//! - Edits applied in place and re-serialized after every change
//! - Rules: required, enum membership, integer format, regex pattern
//! - Swappable message catalog for rendering violations
//! - Schema loading from files or HTTP; file-backed documents with backups
//!
//! Only `type`, `title`, `description`, `default`, `enum`, `maxLength`,
//! `pattern`, `properties` and `required` are interpreted. This is not a
//! general-purpose JSON Schema validator.
//!
//! ## Quick Start
//!
//! ```rust
//! use schemaform::{Form, FormConfig, Rule};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "properties": {
//!         "title": {"type": "string", "maxLength": 80},
//!         "year": {"type": "integer", "maxLength": 4, "default": 2020}
//!     },
//!     "required": ["title"]
//! });
//!
//! let mut form = Form::initialize(&schema, json!({}), FormConfig::default()).unwrap();
//! form.edit("year", "1999").unwrap();
//! form.edit("title", "").unwrap();
//!
//! assert_eq!(form.data()["year"], json!(1999));
//! assert_eq!(form.errors("title"), Some(&vec![Rule::Required]));
//! ```
//!
//! ## Modules
//!
//! - [`data`] - Schema model, data tree, field descriptors and the compiler
//! - [`binding`] - Applying edits to the data tree
//! - [`validate`] - Validation rules, reports and messages
//! - [`form`] - The form orchestrator
//! - [`host`] - Storage for the serialized document
//! - [`source`] - Schema loading
//! - [`config`] - Form options and settings file
//! - [`run`] - Helpers for driving a form from the command line

#[macro_use]
extern crate log;

/// Schema model, data tree, field descriptors and the field compiler.
pub mod data;

/// Applies user edits to the data tree.
pub mod binding;

/// Validation rules, error collections and the message catalog.
pub mod validate;

/// Form orchestrator owning the data tree and its fields.
pub mod form;

/// Host document field implementations.
pub mod host;

/// Schema document loading from files or URLs.
pub mod source;

/// Form options and the TOML settings file.
pub mod config;

/// Command-line driver helpers.
pub mod run;

pub use config::{FormConfig, Settings};
pub use data::{
    field::{FieldDescriptor, FieldKind},
    schema::SchemaError,
};
pub use form::{Form, FormError};
pub use serde_json::Value;
pub use validate::{ErrorCollection, MessageCatalog, Rule, ValidationReport};
