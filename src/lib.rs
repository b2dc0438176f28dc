#![forbid(unsafe_code)]
//! sockidl: an IDL compiler for socket RPC and notification code
//!
//! An IDL source declares interfaces, data types and methods with `in`/`out`/`inout` parameters. This crate
//! checks it, assigns every message an id, and generates one Rust file per interface containing the message
//! types, a client, and (for service interfaces) a service trait and server built on `sockidl_runtime`.
//!
//! ## Pipeline
//!
//! 1. [`frontend`]: lex, parse, resolve types, check, classify interfaces
//! 2. [`backend::protocol`]: allocate message ids and derive message schemas
//! 3. [`backend::emit`]: emit and format Rust source
//!
//! [`pipeline::compile`] runs all three.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! ## Examples
//!
//! ```rust
//! use sockidl::backend::CodegenConfig;
//!
//! let output = sockidl::pipeline::compile("interface Calc { int add(in int a, in int b); };", &CodegenConfig::default())
//!     .unwrap();
//! assert_eq!(output.files[0].file_name, "calc.rs");
//! assert!(output.files[0].source.contains("pub const MSG_ADD_REQ: u32 = 1000;"));
//! ```

pub mod backend;
pub mod cli;
pub mod frontend;
pub mod pipeline;
pub mod version;

pub use frontend::ast;
pub use frontend::diagnostics;
pub use frontend::lexer;
pub use frontend::parser;

pub use backend::{CodegenConfig, GeneratedFile};
pub use pipeline::{CompileFailure, CompileOutput, compile};
