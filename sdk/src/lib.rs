//! mime
//!
//! Front door to the Mime schema language.
//!
//! - `compile_schema` / `compile_file` (re-exported from the compiler)
//! - `schema_to_json` / `compile_to_json` for handing a validated schema to
//!   code generators and other tools

pub use mime_compiler::{
    compile_file, compile_schema, parse_document, Compiled, Diagnostic, Diagnostics, MimeError,
    ParseOutput, Schema, Severity,
};

/// Render a validated schema (entities, enums and views) as pretty JSON.
pub fn schema_to_json(schema: &Schema) -> Result<String, MimeError> {
    Ok(serde_json::to_string_pretty(schema)?)
}

/// Compile schema text and render it as pretty JSON.
pub fn compile_to_json(text: &str) -> Result<String, MimeError> {
    let compiled = compile_schema(text)?;
    schema_to_json(&compiled.schema)
}

pub mod error {
    pub use mime_compiler::error::{MimeError, Result};
}

pub mod types {
    pub use mime_compiler::attributes::Attribute;
    pub use mime_compiler::types::{
        DataType, DefaultValue, EntityNode, EnumLiteral, EnumNode, Field, FieldKind,
        ReferenceTarget,
    };
    pub use mime_compiler::views::{EntityObject, EntityViews, ViewField};
}
