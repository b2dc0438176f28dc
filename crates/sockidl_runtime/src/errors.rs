//! Error types surfaced by generated clients and servers.
//!
//! Three layers, each wrapping the one below:
//! - [`WireError`]: a payload could not be encoded or decoded.
//! - [`TransportError`]: the socket or the framing around payloads failed.
//! - [`RpcError`]: what a generated client method returns.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Encoding or decoding failure for a single payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("buffer underflow: needed {needed} bytes, {remaining} remaining")]
    Underflow { needed: usize, remaining: usize },

    #[error("string field is not valid UTF-8")]
    InvalidUtf8,

    #[error("invalid ordinal {value} for enum {type_name}")]
    InvalidEnum { type_name: &'static str, value: i32 },

    #[error("expected message id {expected}, found {found}")]
    UnexpectedMessage { expected: u32, found: u32 },

    #[error("length {0} does not fit in a 4-byte length prefix")]
    LengthOverflow(usize),

    #[error("fixed array expects {expected} elements, decoded {found}")]
    ArrayLength { expected: usize, found: usize },

    #[error("sequence count {count} of zero-width elements exceeds the {remaining} bytes remaining")]
    ZeroWidthCount { count: usize, remaining: usize },
}

/// Socket-level failure.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("frame of {len} bytes exceeds the {max}-byte limit")]
    FrameTooLarge { len: usize, max: usize },

    #[error("connection closed by peer")]
    Closed,

    #[error("not connected")]
    NotConnected,

    #[error("server is already running")]
    AlreadyRunning,

    #[error(transparent)]
    Wire(#[from] WireError),
}

/// Failure of a remote call made through a generated client.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("client is not connected")]
    NotConnected,

    #[error("no response {response_id} to request {request_id} within {timeout:?}")]
    Timeout {
        request_id: u32,
        response_id: u32,
        timeout: Duration,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("malformed message: {0}")]
    Decode(#[from] WireError),
}

impl RpcError {
    /// Whether the call may succeed if retried on the same connection.
    pub fn is_timeout(&self) -> bool {
        matches!(self, RpcError::Timeout { .. })
    }
}
