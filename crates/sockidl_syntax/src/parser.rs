//! Recursive-descent parser for IDL sources.
//!
//! Converts a token stream into a [`CompilationUnit`]: top-level modules and interfaces, with every interface
//! reachable through [`CompilationUnit::interfaces`] whether or not it was nested in a module.
//!
//! ## Grammar
//!
//! ```text
//! unit       := (module | interface)*
//! module     := 'module' IDENT '{' (interface | struct | enum | typedef)* '}' ';'?
//! interface  := 'interface' IDENT '{' (struct | enum | method)* '}' ';'?
//! struct     := 'struct' IDENT '{' (type_spec IDENT ';')* '}' ';'?
//! enum       := 'enum' IDENT '{' IDENT (',' IDENT)* ','? '}' ';'?
//! typedef    := 'typedef' type_spec IDENT ';'
//! method     := 'callback'? type_spec IDENT '(' (param (',' param)*)? ')' ';'
//! param      := ('in' | 'out' | 'inout')? type_spec IDENT ('[' INT? ']')?
//! type_spec  := 'sequence' '<' NAME '>' | NAME
//! ```
//!
//! ## Examples
//!
//! ```rust
//! use sockidl_syntax::{lexer, parser};
//!
//! let source = "module shop { struct Item { string name; int qty; }; interface Cart { void add(in Item item); }; };";
//! let tokens = lexer::lex(source).unwrap();
//! let unit = parser::parse(&tokens).unwrap();
//! assert_eq!(unit.interfaces().next().map(|i| i.name()), Some("Cart"));
//! ```

use crate::ast::*;
use crate::diagnostics::Diagnostic;
use crate::lexer::{Token, TokenKind};
use sockidl_core::lang::keywords::KeywordId;
use sockidl_core::lang::punctuation::PunctuationId;

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/decl.rs");
include!("parser/methods.rs");
include!("parser/types.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
