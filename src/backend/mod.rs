//! Code generation backend.
//!
//! The pipeline is:
//! 1. [`protocol::plan_unit`] assigns message ids and derives message schemas for every emitted interface.
//! 2. [`emit::generate`] turns each [`protocol::ProtocolPlan`] into one formatted Rust file.
//!
//! ## Module Organization
//!
//! - `config.rs` - Knobs shared by planning and emission
//! - `protocol/` - Id allocation, message schemas, the JSON protocol descriptor
//! - `emit/` - Plan → Rust tokens → formatted source

pub mod config;
pub mod emit;
pub mod protocol;

pub use config::CodegenConfig;
pub use emit::{EmitError, GeneratedFile, generate};
pub use protocol::{ProtocolDescriptor, ProtocolPlan, plan_unit};
