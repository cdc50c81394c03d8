use std::fs;
use std::path::Path;

use log::debug;

use crate::{
    diagnostics::Diagnostic,
    error::{MimeError, Result},
    parser::{ParseOutput, Parser},
    schema::Schema,
};

/// A document that parsed without errors.
#[derive(Debug, Clone)]
pub struct Compiled {
    pub schema:   Schema,
    pub warnings: Vec<Diagnostic>,
}

/// Compile schema text.
/// Returns `Err(MimeError::Rejected)` if any error diagnostic was raised.
pub fn compile_schema(text: &str) -> Result<Compiled> {
    finish(Parser::new(text).parse())
}

/// Read and compile a `.mime` file. Diagnostics carry the path as file name.
pub fn compile_file(path: impl AsRef<Path>) -> Result<Compiled> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    finish(Parser::with_file(&text, path.display().to_string()).parse())
}

fn finish(output: ParseOutput) -> Result<Compiled> {
    let ParseOutput { schema, diagnostics } = output;
    debug!(
        entities = schema.entities().len(),
        enums = schema.enums().len(),
        diagnostics = diagnostics.len();
        "parse finished"
    );

    let diagnostics = diagnostics.into_vec();
    if let Some(err) = MimeError::rejected(diagnostics.clone()) {
        return Err(err);
    }
    Ok(Compiled { schema, warnings: diagnostics })
}
