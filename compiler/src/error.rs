use thiserror::Error;

use crate::diagnostics::Diagnostic;

pub type Result<T> = std::result::Result<T, MimeError>;

#[derive(Debug, Error)]
pub enum MimeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{first} ({count} error(s) in total)")]
    Rejected {
        first:       Diagnostic,
        count:       usize,
        diagnostics: Vec<Diagnostic>,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MimeError {
    /// Builds a `Rejected` error from the full diagnostic list of a parse.
    /// Returns `None` when the list holds no errors.
    pub fn rejected(diagnostics: Vec<Diagnostic>) -> Option<Self> {
        let first = diagnostics.iter().find(|d| d.is_error())?.clone();
        let count = diagnostics.iter().filter(|d| d.is_error()).count();
        Some(MimeError::Rejected { first, count, diagnostics })
    }

    /// Every diagnostic carried by the error, warnings included.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            MimeError::Rejected { diagnostics, .. } => diagnostics,
            _ => &[],
        }
    }
}
