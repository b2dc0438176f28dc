//! Syntax frontend for the sockidl interface-definition language: lexer, parser, AST, diagnostics.
//!
//! ## Notes
//! - This crate is "syntax-only": it does not resolve type names or classify interfaces. That happens in the
//!   compiler's semantic layer.
//! - Vocabulary identity (keywords/punctuation/primitives) comes from `sockidl_core::lang` registries.
//!
//! ## Examples
//! ```rust
//! use sockidl_syntax::{lexer, parser};
//!
//! let tokens = lexer::lex("interface Calc { int add(in int a, in int b); };").unwrap();
//! let unit = parser::parse(&tokens).unwrap();
//! assert_eq!(unit.interfaces().count(), 1);
//! ```

#![deny(clippy::unwrap_used)]

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod token_helpers;
