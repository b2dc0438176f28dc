//! Punctuation vocabulary.
//!
//! The IDL only needs single-character punctuation: braces, parentheses, brackets, angle brackets, and the
//! `;`, `,`, `:` separators.
//!
//! ## Examples
//! ```rust
//! use sockidl_core::lang::punctuation::{self, PunctuationId};
//!
//! assert_eq!(punctuation::from_char('<'), Some(PunctuationId::LAngle));
//! assert_eq!(punctuation::as_str(PunctuationId::Semicolon), ";");
//! ```

/// Broad syntactic grouping for punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationCategory {
    /// Brackets, braces, and angle brackets.
    Delimiter,
    /// Separators like `,` and `;`.
    Separator,
}

/// Stable identifier for punctuation tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationId {
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LAngle,
    RAngle,
    Semicolon,
    Comma,
    Colon,
}

/// Metadata for a punctuation token.
#[derive(Debug, Clone, Copy)]
pub struct PunctuationInfo {
    pub id: PunctuationId,
    pub canonical: &'static str,
    pub category: PunctuationCategory,
}

/// Registry of all punctuation tokens, in [`PunctuationId`] declaration order.
pub const PUNCTUATION: &[PunctuationInfo] = &[
    info(PunctuationId::LBrace, "{", PunctuationCategory::Delimiter),
    info(PunctuationId::RBrace, "}", PunctuationCategory::Delimiter),
    info(PunctuationId::LParen, "(", PunctuationCategory::Delimiter),
    info(PunctuationId::RParen, ")", PunctuationCategory::Delimiter),
    info(PunctuationId::LBracket, "[", PunctuationCategory::Delimiter),
    info(PunctuationId::RBracket, "]", PunctuationCategory::Delimiter),
    info(PunctuationId::LAngle, "<", PunctuationCategory::Delimiter),
    info(PunctuationId::RAngle, ">", PunctuationCategory::Delimiter),
    info(PunctuationId::Semicolon, ";", PunctuationCategory::Separator),
    info(PunctuationId::Comma, ",", PunctuationCategory::Separator),
    info(PunctuationId::Colon, ":", PunctuationCategory::Separator),
];

/// Canonical spelling of a punctuation token.
pub fn as_str(id: PunctuationId) -> &'static str {
    info_for(id).canonical
}

/// Full metadata for a punctuation token.
pub fn info_for(id: PunctuationId) -> &'static PunctuationInfo {
    &PUNCTUATION[id as usize]
}

/// Lookup by spelling.
pub fn from_str(s: &str) -> Option<PunctuationId> {
    PUNCTUATION.iter().find(|p| p.canonical == s).map(|p| p.id)
}

/// Lookup by a single source character (what the lexer sees).
pub fn from_char(c: char) -> Option<PunctuationId> {
    let mut buf = [0u8; 4];
    from_str(c.encode_utf8(&mut buf))
}

const fn info(id: PunctuationId, canonical: &'static str, category: PunctuationCategory) -> PunctuationInfo {
    PunctuationInfo {
        id,
        canonical,
        category,
    }
}
