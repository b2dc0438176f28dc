//! sockidl compiler version information.
//!
//! This module exposes the compiler version as a single constant so all subsystems
//! (CLI, codegen headers, protocol descriptors) agree on the same value.
//!
//! ## Notes
//!
//! - The value is taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile time.

/// The sockidl compiler version string (for example, `0.1.0-alpha.1`).
pub const SOCKIDL_VERSION: &str = env!("CARGO_PKG_VERSION");
