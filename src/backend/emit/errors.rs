//! Errors for plan → Rust emission.
//!
//! These are *backend* failures: the unit already passed semantic checks, so most of them point at a codegen
//! bug or at a configuration value rather than at the IDL source.

/// Error during Rust emission.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// The generated tokens did not parse back as a Rust file.
    #[error("syn parse error: {0}")]
    SynParse(String),
    /// `CodegenConfig::runtime_crate` is not a Rust path.
    #[error("invalid runtime crate path '{0}'")]
    InvalidRuntimePath(String),
    /// Two types from different scopes would be generated into one file under the same name.
    #[error("type '{name}' from {first} and {second} would share one generated name in interface '{interface}'")]
    TypeNameClash {
        interface: String,
        name: String,
        first: String,
        second: String,
    },
}
