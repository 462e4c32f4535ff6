//! Rust model stub generation from a record schema.
//!
//! The stub is a plain text artifact named after the schema: a struct with
//! one public field per schema field and a constructor assigning each field
//! from a matching parameter. Field names and types are known at generation
//! time, so no dynamic assignment is involved.

use schema_core::{RecordSchema, TypeTag};
use std::fs;
use std::path::{Path, PathBuf};

/// Rust type used in the generated stub for a field of the given tag.
fn rust_type(tag: TypeTag) -> &'static str {
    match tag {
        TypeTag::Int => "i64",
        TypeTag::String => "String",
        TypeTag::Boolean => "bool",
        TypeTag::Unknown => "Option<serde_json::Value>",
    }
}

/// Render the model stub source for a schema.
pub fn render_model(schema: &RecordSchema) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "// Generated by avro-stream from the \"{}\" schema. Do not edit by hand.\n\n",
        schema.name
    ));

    out.push_str("#[derive(Debug, Clone)]\n");
    out.push_str(&format!("pub struct {} {{\n", schema.name));
    for field in &schema.fields {
        out.push_str(&format!(
            "    pub {}: {},\n",
            field.name,
            rust_type(field.type_tag)
        ));
    }
    out.push_str("}\n\n");

    let params = schema
        .fields
        .iter()
        .map(|f| format!("{}: {}", f.name, rust_type(f.type_tag)))
        .collect::<Vec<_>>()
        .join(", ");

    out.push_str(&format!("impl {} {{\n", schema.name));
    out.push_str(&format!("    pub fn new({params}) -> Self {{\n"));
    out.push_str("        Self {\n");
    for field in &schema.fields {
        out.push_str(&format!("            {},\n", field.name));
    }
    out.push_str("        }\n    }\n}\n");

    out
}

/// Write the model stub to `<out_dir>/<snake_case(name)>.rs`, creating the
/// directory if absent. Returns the path written.
pub fn write_model(schema: &RecordSchema, out_dir: &Path) -> std::io::Result<PathBuf> {
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(format!("{}.rs", snake_case(&schema.name)));
    fs::write(&path, render_model(schema))?;
    Ok(path)
}

fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
