//! Provide the shared, pure vocabulary of the sockidl interface-definition language.
//!
//! This crate is intentionally small and dependency-free. It contains the tables and helpers that both
//! the compiler and the runtime must agree on:
//! - the IDL keyword, punctuation, and primitive-type registries ([`lang`]),
//! - identifier conventions used when IDL names become Rust names ([`naming`]),
//! - protocol constants that are part of the wire contract ([`protocol`]).
//!
//! ## Notes
//!
//! - No IO, no global state, no compiler-specific types.

#![deny(clippy::unwrap_used)]

pub mod lang;
pub mod naming;
pub mod protocol;
