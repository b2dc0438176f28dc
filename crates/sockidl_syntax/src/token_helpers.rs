//! Small helper APIs for working with `Token` / `TokenKind`.
//!
//! These exist to reduce repetitive `matches!(...)` at call sites and to render tokens in diagnostics.

use std::fmt;

use crate::lexer::{Token, TokenKind};
use sockidl_core::lang::keywords::{self, KeywordId};
use sockidl_core::lang::primitives::{self, PrimitiveId};
use sockidl_core::lang::punctuation::{self, PunctuationId};

impl TokenKind {
    /// Return the keyword id, if this is a keyword token.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        match self {
            TokenKind::Keyword(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given keyword.
    pub fn is_keyword(&self, id: KeywordId) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == id)
    }

    /// Return the primitive id, if this is a primitive type name.
    pub fn primitive_id(&self) -> Option<PrimitiveId> {
        match self {
            TokenKind::Primitive(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given punctuation.
    pub fn is_punctuation(&self, id: PunctuationId) -> bool {
        matches!(self, TokenKind::Punctuation(p) if *p == id)
    }

    /// Return the identifier text, if this is a plain identifier.
    pub fn ident(&self) -> Option<&str> {
        match self {
            TokenKind::Ident(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(id) => write!(f, "keyword '{}'", keywords::as_str(*id)),
            TokenKind::Primitive(id) => write!(f, "type '{}'", primitives::as_str(*id)),
            TokenKind::Punctuation(id) => write!(f, "'{}'", punctuation::as_str(*id)),
            TokenKind::Ident(name) => write!(f, "identifier '{name}'"),
            TokenKind::Int(value) => write!(f, "integer {value}"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

impl Token {
    /// Convenience wrapper for `self.kind.keyword_id()`.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        self.kind.keyword_id()
    }

    /// Convenience wrapper for `self.kind.is_punctuation(id)`.
    pub fn is_punctuation(&self, id: PunctuationId) -> bool {
        self.kind.is_punctuation(id)
    }
}
