//! Define the reserved structural keywords of the IDL.
//!
//! This module is the single source of truth for reserved words: a stable identifier ([`KeywordId`]) plus a
//! const metadata table ([`KEYWORDS`]) that records canonical spellings, categories and descriptions.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - Primitive type names (`int`, `string`, `void`, `boolean`, ...) are reserved too, but live in
//!   [`crate::lang::primitives`] because they also carry wire metadata.
//! - [`KEYWORDS`] is ordered exactly like [`KeywordId`]; [`info_for`] relies on that.
//!
//! ## Examples
//! ```rust
//! use sockidl_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("inout"), Some(KeywordId::Inout));
//! assert_eq!(keywords::from_str("Interface"), None);
//! ```

/// Stable identifier for every reserved keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Declarations
    Module,
    Interface,
    Struct,
    Enum,
    Typedef,

    // Type constructors
    Sequence,

    // Method modifiers
    Callback,

    // Parameter directions
    In,
    Out,
    Inout,
}

/// High-level grouping for documentation and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    Declaration,
    TypeConstructor,
    Modifier,
    Direction,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
    pub description: &'static str,
}

/// Registry of all reserved keywords, in [`KeywordId`] declaration order.
pub const KEYWORDS: &[KeywordInfo] = &[
    info(
        KeywordId::Module,
        "module",
        KeywordCategory::Declaration,
        "Namespace grouping interfaces, structs, enums and typedefs.",
    ),
    info(
        KeywordId::Interface,
        "interface",
        KeywordCategory::Declaration,
        "Remote interface: a set of methods served over one connection.",
    ),
    info(
        KeywordId::Struct,
        "struct",
        KeywordCategory::Declaration,
        "Record type encoded field by field.",
    ),
    info(
        KeywordId::Enum,
        "enum",
        KeywordCategory::Declaration,
        "Enumeration encoded as its zero-based ordinal.",
    ),
    info(
        KeywordId::Typedef,
        "typedef",
        KeywordCategory::Declaration,
        "Alias for another type expression.",
    ),
    info(
        KeywordId::Sequence,
        "sequence",
        KeywordCategory::TypeConstructor,
        "Dynamic, count-prefixed list: `sequence<T>`.",
    ),
    info(
        KeywordId::Callback,
        "callback",
        KeywordCategory::Modifier,
        "Marks a one-way server-to-client method.",
    ),
    info(
        KeywordId::In,
        "in",
        KeywordCategory::Direction,
        "Parameter sent from client to server (the default).",
    ),
    info(
        KeywordId::Out,
        "out",
        KeywordCategory::Direction,
        "Parameter filled in by the server and returned in the response.",
    ),
    info(
        KeywordId::Inout,
        "inout",
        KeywordCategory::Direction,
        "Parameter sent in the request and returned, possibly updated, in the response.",
    ),
];

/// Canonical spelling of a keyword.
///
/// ## Parameters
/// - `id`: Keyword identifier.
///
/// ## Returns
/// - The canonical spelling (e.g. `"interface"`).
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Category of a keyword.
pub fn category(id: KeywordId) -> KeywordCategory {
    info_for(id).category
}

/// Full metadata for a keyword.
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    &KEYWORDS[id as usize]
}

/// Lookup by spelling.
///
/// ## Returns
/// - `Some(KeywordId)` if `s` is a reserved keyword, `None` otherwise.
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical == s).map(|k| k.id)
}

// --- helpers -----------------------------------------------------------------

const fn info(
    id: KeywordId,
    canonical: &'static str,
    category: KeywordCategory,
    description: &'static str,
) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category,
        description,
    }
}
