//! Token types for the IDL lexer.
//!
//! Vocabulary tokens carry **registry-backed IDs**:
//! - `Keyword(KeywordId)` for structural reserved words
//! - `Primitive(PrimitiveId)` for built-in type names (also reserved)
//! - `Punctuation(PunctuationId)` for punctuation
//!
//! ## Notes
//! - Every token keeps its literal source text in `lexeme`, which diagnostics quote verbatim.
//! - Use `crate::token_helpers` for ergonomic token matching at call sites.

use crate::ast::Span;
use sockidl_core::lang::keywords::{self, KeywordId};
use sockidl_core::lang::primitives::{self, PrimitiveId};
use sockidl_core::lang::punctuation::PunctuationId;

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Keyword(KeywordId),
    Primitive(PrimitiveId),
    Punctuation(PunctuationId),
    Ident(String),
    /// Unsigned integer literal (array sizes).
    Int(u64),
    Eof,
}

/// A token with its kind, literal text, and source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    pub fn line(&self) -> usize {
        self.span.line
    }

    pub fn column(&self) -> usize {
        self.span.column
    }
}

/// Classify an identifier-shaped spelling as keyword, primitive, or plain identifier.
pub fn classify_word(word: &str) -> TokenKind {
    if let Some(id) = keywords::from_str(word) {
        TokenKind::Keyword(id)
    } else if let Some(id) = primitives::from_str(word) {
        TokenKind::Primitive(id)
    } else {
        TokenKind::Ident(word.to_string())
    }
}
