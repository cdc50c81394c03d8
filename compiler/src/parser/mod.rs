//! Recursive-descent parser for `.mime` documents.
//!
//! The top level dispatches on `entity` and `enum`. A declaration that fails
//! is dropped whole and parsing resumes at the next declaration, so one bad
//! block never hides the rest of the document.

mod annotations;
mod entity;
mod enums;

use log::{debug, trace};

use crate::{
    cursor::TokenCursor,
    diagnostics::{Diagnostic, Diagnostics, Severity},
    schema::Schema,
    token::{Token, TokenKind},
    tokenizer::Tokenizer,
    types::{EntityNode, EnumNode},
    utils::quote,
    verifier::verify_links,
};

/// Hard failure of the construct being parsed.
pub(crate) type PResult<T> = std::result::Result<T, Diagnostic>;

/// What a parse produces: every accepted declaration plus everything that
/// was reported along the way.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    pub schema:      Schema,
    pub diagnostics: Diagnostics,
}

pub struct Parser<'a> {
    cursor:      TokenCursor<'a>,
    diagnostics: Diagnostics,
    schema:      Schema,
    file:        String,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_file(input, "")
    }

    pub fn with_file(input: &'a str, file: impl Into<String>) -> Self {
        let file = file.into();
        Parser {
            cursor:      TokenCursor::new(Tokenizer::with_file(input, file.clone())),
            diagnostics: Diagnostics::new(),
            schema:      Schema::new(),
            file,
        }
    }

    pub fn parse(mut self) -> ParseOutput {
        while !self.cursor.at_eof() {
            match self.cursor.kind() {
                TokenKind::Newline | TokenKind::Comment => {
                    self.cursor.advance();
                }
                TokenKind::Entity => match self.parse_entity() {
                    Some(entity) => self.register_entity(entity),
                    None => self.recover(),
                },
                TokenKind::Enum => match self.parse_enum() {
                    Some(node) => self.register_enum(node),
                    None => self.recover(),
                },
                TokenKind::Alter => {
                    let tok = self.cursor.advance();
                    self.diagnostics.error(&tok, "alter blocks are not supported");
                    self.recover();
                }
                _ => {
                    let tok = self.cursor.advance();
                    self.diagnostics
                        .error(&tok, format!("unexpected {} at top level", tok.describe()));
                }
            }
        }

        let links = verify_links(&self.schema, &self.file);
        self.diagnostics.extend(links);

        ParseOutput {
            schema:      self.schema,
            diagnostics: self.diagnostics,
        }
    }

    /// Skips to the next `entity`, `enum` or end of file. An escaped name
    /// such as `*entity` is skipped as a unit.
    fn recover(&mut self) {
        let mut skipped = 0usize;
        loop {
            match self.cursor.kind() {
                TokenKind::Entity | TokenKind::Enum | TokenKind::Eof => break,
                TokenKind::Star => {
                    self.cursor.advance();
                    if !self.cursor.at_eof() {
                        self.cursor.advance();
                    }
                    skipped += 2;
                }
                _ => {
                    self.cursor.advance();
                    skipped += 1;
                }
            }
        }
        trace!(skipped, line = self.cursor.current().line; "recovered at next declaration");
    }

    fn register_entity(&mut self, entity: EntityNode) {
        let name = entity.name.clone();
        match self.schema.register_entity(entity) {
            Ok(()) => debug!(entity = name.as_str(); "entity accepted"),
            Err(entity) => self.report_redeclared(&entity.name, entity.line, entity.column),
        }
    }

    fn register_enum(&mut self, node: EnumNode) {
        let name = node.name.clone();
        match self.schema.register_enum(node) {
            Ok(()) => debug!(enum_name = name.as_str(); "enum accepted"),
            Err(node) => self.report_redeclared(&node.name, node.line, node.column),
        }
    }

    fn report_redeclared(&mut self, name: &str, line: usize, column: usize) {
        debug!(name; "declaration dropped, name already taken");
        self.diagnostics.push(Diagnostic::new(
            Severity::Error,
            format!("{} is already declared", quote(name)),
            line,
            column,
            &self.file,
        ));
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> PResult<Token> {
        if self.cursor.at(kind) {
            Ok(self.cursor.advance())
        } else {
            Err(self.unexpected(what))
        }
    }

    fn expect_ident(&mut self, what: &str) -> PResult<Token> {
        self.expect(TokenKind::Ident, what)
    }

    fn unexpected(&self, what: &str) -> Diagnostic {
        let tok = self.cursor.current();
        Diagnostic::error(tok, format!("{}, found {}", what, tok.describe()))
    }
}

/// Parses a whole document.
pub fn parse_document(text: &str) -> ParseOutput {
    Parser::new(text).parse()
}
