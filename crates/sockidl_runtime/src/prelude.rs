//! Everything generated bindings refer to unqualified.

pub use crate::InterfaceHandle;
pub use crate::client::{ClientCore, ClientState, NotificationDispatch};
pub use crate::config::{ClientConfig, ServerConfig};
pub use crate::errors::{RpcError, TransportError, WireError};
pub use crate::server::{ClientId, ConnectionEvents, Handler, HandlerTable, ServerCore, current_client};
pub use crate::wire::{ByteReader, ByteWriter, Message, Wire};
pub use sockidl_core::protocol::STATUS_OK;
