//! Schema model, data tree and field descriptors.
//!
//! ## Architecture
//!
//! - [`schema`] - Parsed schema nodes and [`SchemaError`](schema::SchemaError)
//! - [`tree`] - Value references into the data tree and serialization
//! - [`field`] - Compiled field descriptors
//! - [`compile`] - Field compiler (schema + data tree -> descriptors)

/// Schema model parsing.
pub mod schema;

/// Data tree addressing and serialization.
pub mod tree;

/// Field descriptors and their constraints.
pub mod field;

/// Field compiler.
pub mod compile;

pub use compile::compile;
pub use field::{FieldDescriptor, FieldKind};
pub use schema::{ObjectSchema, PropertySchema, SchemaError, SchemaType};
