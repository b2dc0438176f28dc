//! IDL vocabulary registries.
//!
//! Callers work with **stable IDs** (`KeywordId`, `PunctuationId`, `PrimitiveId`) and look up spellings and
//! metadata via registry tables instead of comparing strings all over the compiler.
//!
//! ## Notes
//! - Registries are **pure**: no AST types, no IO, no side effects.
//! - The lexer/parser enforce syntax; registries provide spellings and metadata for shared use (diagnostics,
//!   code generation, descriptors).
//!
//! ## Examples
//! ```rust
//! use sockidl_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("interface"), Some(KeywordId::Interface));
//! assert_eq!(keywords::as_str(KeywordId::Interface), "interface");
//! ```

pub mod keywords;
pub mod primitives;
pub mod punctuation;
pub mod rust_keywords;
