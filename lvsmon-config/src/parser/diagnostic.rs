//! Non-fatal conditions found while reading a configuration
//!
//! None of these stop the parse. The offending value is dropped and the
//! field keeps its default.

use crate::parser::lexer::Location;
use thiserror::Error;

/// What went wrong
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagnosticKind {
    #[error("{field} value is {len} bytes long, at most {max} allowed")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("invalid {field} value {value:?}, expected {expected}")]
    InvalidValue {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("{method} health check is not implemented, block ignored")]
    Unimplemented { method: &'static str },
}

/// A non-fatal condition and where it was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub span: Location,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, span: Location) -> Self {
        Self { kind, span }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at position {}", self.kind, self.span.start)
    }
}
