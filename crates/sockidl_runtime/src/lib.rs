//! Runtime support for sockidl-generated Rust code.
//!
//! Generated bindings are thin: message structs implement [`wire::Message`], clients wrap a
//! [`client::ClientCore`] and servers wrap a [`server::ServerCore`]. Everything that touches a socket lives here.
//!
//! ```ignore
//! use sockidl_runtime::prelude::*;
//! ```

#![deny(clippy::unwrap_used)]

pub mod client;
pub mod config;
pub mod errors;
pub mod frame;
pub mod prelude;
pub mod server;
pub mod wire;

/// Re-exported so generated code can log without its own `tracing` dependency.
pub use tracing;

/// Wire representation of an interface-typed parameter: an opaque integer handle.
pub type InterfaceHandle = i32;

pub use errors::{RpcError, TransportError, WireError};
