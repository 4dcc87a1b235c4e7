//! Tokenizer for keepalived-style configuration files
//!
//! Splits the source into whitespace-delimited words.
//!
//! Key features:
//! - Words are maximal runs of non-whitespace characters
//! - `{` and `}` are ordinary words, so they must be surrounded by whitespace
//! - `#` or `!` at the start of a word comments out the rest of the line
//! - No lookahead and no pushback: the parser pulls one word at a time

use logos::{Logos, Span};

/// Source location for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    pub start: usize,
    pub end: usize,
}

impl From<Span> for Location {
    fn from(span: Span) -> Self {
        Self {
            start: span.start,
            end: span.end,
        }
    }
}

impl Location {
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

/// A value with its location in the source
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Location,
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: impl Into<Location>) -> Self {
        Self {
            value,
            span: span.into(),
        }
    }
}

/// One whitespace-delimited word borrowed from the source
pub type Word<'src> = Spanned<&'src str>;

/// Raw token classes
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum Token {
    #[regex(r"[ \t\r\n\f]+", logos::skip)]
    Whitespace,

    // Runs to the end of the line; the newline itself is whitespace.
    #[regex(r"[#!][^\n]*", logos::skip)]
    Comment,

    #[regex(r"[^ \t\r\n\f#!][^ \t\r\n\f]*")]
    Word,
}

/// Lexer error
///
/// The three token patterns cover every character, so the current grammar
/// never produces this. It stays so that a narrower `Word` pattern surfaces
/// as an error instead of silently dropping input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexError {
    #[error("Unexpected character at position {position}")]
    UnexpectedChar { position: usize },
}

/// Pulls words from a source string on demand
pub struct Tokenizer<'src> {
    lexer: logos::Lexer<'src, Token>,
}

impl<'src> Tokenizer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            lexer: Token::lexer(source),
        }
    }
}

impl<'src> Iterator for Tokenizer<'src> {
    type Item = Result<Word<'src>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let token = self.lexer.next()?;
            let span = self.lexer.span();
            return Some(match token {
                Ok(Token::Word) => Ok(Spanned::new(self.lexer.slice(), span)),
                // Should have been skipped by logos attribute
                Ok(Token::Whitespace) | Ok(Token::Comment) => continue,
                Err(()) => Err(LexError::UnexpectedChar {
                    position: span.start,
                }),
            });
        }
    }
}

/// Lexer result type
pub type LexResult<'src> = Result<Vec<Word<'src>>, LexError>;

/// Split a whole source string into words
pub fn tokenize(source: &str) -> LexResult<'_> {
    Tokenizer::new(source).collect()
}
