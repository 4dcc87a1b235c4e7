//! Parser module for keepalived.conf
//!
//! This module provides the keyword table, tokenizer, diagnostics and the
//! block parsers that build a [`Configuration`](lvsmon_core::config::Configuration).

pub mod diagnostic;
pub mod keyword;
pub mod lexer;
pub mod parser;

pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use keyword::Keyword;
pub use lexer::{tokenize, LexError, Location, Spanned, Token, Tokenizer, Word};
pub use parser::{parse, ParseError, Parsed, Parser};
