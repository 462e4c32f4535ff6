//! Core types for the avro-stream pipeline.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - [`RecordSchema`] - Normalized model of a named record and its ordered fields
//! - [`TypeTag`] - Closed set of primitive types a field resolves to
//! - [`FieldValue`] / [`Record`] - Synthesized values keyed by field name
//! - [`SchemaError`] - Failures while building a schema model
//!
//! # Architecture
//!
//! ```text
//! schema-core (this crate)
//!    │
//!    ├─── datagen       (synthesizes FieldValues per RecordSchema)
//!    │
//!    └─── kafka-bridge  (encodes Records for transport)
//! ```
//!
//! # Example
//!
//! ```rust
//! use schema_core::{RecordSchema, TypeTag};
//!
//! let schema = RecordSchema::from_json(r#"{
//!     "name": "User",
//!     "fields": [
//!         {"name": "id", "type": "int"},
//!         {"name": "email", "type": ["null", "string"]}
//!     ]
//! }"#).unwrap();
//!
//! assert_eq!(schema.fields[0].type_tag, TypeTag::Int);
//! assert_eq!(schema.fields[1].type_tag, TypeTag::String);
//! ```

pub mod schema;
pub mod value;

// Re-exports for convenience
pub use schema::{FieldSpec, RecordSchema, SchemaError, TypeTag};
pub use value::{FieldValue, Record};
