//! mime-compiler
//!
//! This crate implements:
//!  1) A tokenizer and a two-token cursor for `.mime` documents,
//!  2) A recursive-descent parser for `entity` and `enum` declarations,
//!  3) An attribute/constraint verifier (per-type attribute table, combination rules, links),
//!  4) Payload/response views derived from each accepted entity,
//!  5) Diagnostics (`Diagnostic`, `Diagnostics`) and the `MimeError` type.

pub mod attributes;
pub mod compiler;
pub mod cursor;
pub mod diagnostics;
pub mod error;
pub mod parser;
pub mod schema;
pub mod token;
pub mod tokenizer;
pub mod types;
pub mod utils;
pub mod verifier;
pub mod views;

pub use compiler::{compile_file, compile_schema, Compiled};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::MimeError;
pub use parser::{parse_document, ParseOutput, Parser};
pub use schema::Schema;
pub use tokenizer::tokenize_schema;
