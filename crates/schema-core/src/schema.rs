//! Schema model for Avro-style record documents.
//!
//! A schema source is a JSON document of the shape
//! `{ "name": ..., "fields": [ { "name": ..., "type": ... }, ... ] }` where a
//! field type is either a scalar type name or a union list. A two-element
//! union containing the literal `"null"` denotes "nullable T"; the model
//! resolves it to the non-null member and drops the nullability fact, so
//! generation always emits a present value.

use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Error type for schema operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading the schema file
    #[error("Failed to read schema file: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing the schema document
    #[error("Failed to parse schema JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Schema document is not a JSON object
    #[error("Schema document is not a JSON object")]
    NotAnObject,

    /// Schema lacks a non-empty record name
    #[error("Schema is missing a non-empty 'name'")]
    MissingName,

    /// Schema lacks a fields list
    #[error("Schema is missing a 'fields' list")]
    MissingFields,

    /// A field entry lacks a name
    #[error("Field at position {0} is missing a 'name'")]
    FieldMissingName(usize),

    /// A field entry lacks a type
    #[error("Field '{0}' is missing a 'type'")]
    FieldMissingType(String),

    /// Two fields share the same name
    #[error("Duplicate field name: {0}")]
    DuplicateField(String),
}

/// Primitive type a field resolves to after union handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// 64-bit signed integer
    Int,
    /// UTF-8 string
    String,
    /// Boolean
    Boolean,
    /// Any type without a generation rule. Fields of this type synthesize
    /// to an explicit null rather than being omitted.
    Unknown,
}

impl TypeTag {
    /// Resolve a scalar type name from a schema document.
    pub fn from_scalar(name: &str) -> TypeTag {
        match name {
            "int" => TypeTag::Int,
            "string" => TypeTag::String,
            "boolean" => TypeTag::Boolean,
            _ => TypeTag::Unknown,
        }
    }
}

/// One field of a record schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name, unique within the record
    pub name: String,

    /// Resolved primitive type
    pub type_tag: TypeTag,
}

/// Normalized in-memory model of a named record.
///
/// Field order is preserved verbatim from the schema source. Building the
/// model is a pure function of the document: two builds from the same
/// document compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    /// Record name, non-empty
    pub name: String,

    /// Ordered field list
    pub fields: Vec<FieldSpec>,
}

impl RecordSchema {
    /// Load a schema from a `.avsc` JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a schema from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let document: Value = serde_json::from_str(json)?;
        Self::from_document(&document)
    }

    /// Build a schema model from a parsed schema document.
    pub fn from_document(document: &Value) -> Result<Self, SchemaError> {
        let object = document.as_object().ok_or(SchemaError::NotAnObject)?;

        let name = object
            .get("name")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or(SchemaError::MissingName)?
            .to_string();

        let raw_fields = object
            .get("fields")
            .and_then(Value::as_array)
            .ok_or(SchemaError::MissingFields)?;

        let mut fields = Vec::with_capacity(raw_fields.len());
        let mut seen = HashSet::new();

        for (position, raw) in raw_fields.iter().enumerate() {
            let field_name = raw
                .get("name")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .ok_or(SchemaError::FieldMissingName(position))?;

            let raw_type = raw
                .get("type")
                .ok_or_else(|| SchemaError::FieldMissingType(field_name.to_string()))?;

            if !seen.insert(field_name.to_string()) {
                return Err(SchemaError::DuplicateField(field_name.to_string()));
            }

            fields.push(FieldSpec {
                name: field_name.to_string(),
                type_tag: resolve_type(raw_type),
            });
        }

        Ok(RecordSchema { name, fields })
    }

    /// Get a field spec by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get all field names in schema order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}

/// Resolve a raw field type value to a type tag.
///
/// Scalars resolve directly. A union list resolves to its first member that
/// is not the literal `"null"`, then as a scalar; a union with no such
/// member, or a member that is not a scalar string, resolves to `Unknown`.
fn resolve_type(raw: &Value) -> TypeTag {
    match raw {
        Value::String(scalar) => TypeTag::from_scalar(scalar),
        Value::Array(members) => members
            .iter()
            .find(|m| m.as_str() != Some("null"))
            .and_then(Value::as_str)
            .map(TypeTag::from_scalar)
            .unwrap_or(TypeTag::Unknown),
        _ => TypeTag::Unknown,
    }
}
