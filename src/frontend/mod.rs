//! sockidl compiler frontend
//!
//! This module contains all frontend components:
//! - `lexer`, `parser`, `ast`, `diagnostics`: provided by the `sockidl_syntax` crate
//! - `symbols`: name tables over a parsed unit
//! - `resolve`: type-reference resolution
//! - `model`: the resolved, classification-ready representation
//! - `checker`: semantic validation and lowering
//! - `classify`: interface roles and observer relationships

// Syntax components are provided by the shared sockidl_syntax crate.
pub use sockidl_syntax::{ast, diagnostics, lexer, parser};

// Compiler-specific pieces remain local.
pub mod checker;
pub mod classify;
pub mod model;
pub mod resolve;
pub mod symbols;
