//! Diagnostics collected while tokenizing, parsing and validating a document.
//!
//! Nothing here stops the parser. A [`Diagnostics`] collector is owned by one
//! parser instance and only accumulates facts that the caller reports later.

use std::fmt;

use serde::Serialize;

use crate::token::Token;

/// How serious a diagnostic is. Warnings never cause a declaration to be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message:  String,
    pub line:     usize,
    pub column:   usize,
    pub file:     String,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        message: impl Into<String>,
        line: usize,
        column: usize,
        file: &str,
    ) -> Self {
        Diagnostic {
            severity,
            message: message.into(),
            line,
            column,
            file: file.to_string(),
        }
    }

    /// An error positioned at `token`.
    pub fn error(token: &Token, message: impl Into<String>) -> Self {
        Self::at(Severity::Error, token, message)
    }

    /// A warning positioned at `token`.
    pub fn warning(token: &Token, message: impl Into<String>) -> Self {
        Self::at(Severity::Warning, token, message)
    }

    fn at(severity: Severity, token: &Token, message: impl Into<String>) -> Self {
        Self::new(severity, message, token.line, token.column, &token.file)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.file.is_empty() {
            write!(f, "{}:", self.file)?;
        }
        write!(
            f,
            "{}:{}: {}: {}",
            self.line, self.column, self.severity, self.message
        )
    }
}

/// Accumulates diagnostics in the order they were raised.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn error(&mut self, token: &Token, message: impl Into<String>) {
        self.push(Diagnostic::error(token, message));
    }

    pub fn warning(&mut self, token: &Token, message: impl Into<String>) {
        self.push(Diagnostic::warning(token, message));
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.items.extend(diagnostics);
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(Diagnostic::is_error)
    }

    /// Number of errors raised so far. Parsers take this as a mark before a
    /// declaration and compare afterwards to see whether it failed.
    pub fn error_count(&self) -> usize {
        self.items.iter().filter(|d| d.is_error()).count()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|d| d.is_warning())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}
