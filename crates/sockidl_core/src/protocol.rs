//! Protocol constants shared by the code generator and the runtime.
//!
//! Everything in this module is observable on the wire or in generated APIs. Two parties generated from the
//! same schema only interoperate if they agree on these values.

/// First message id allocated for every interface.
pub const DEFAULT_MESSAGE_ID_BASE: u32 = 1000;

/// Size of the message id that starts every payload, in bytes.
pub const MESSAGE_ID_LEN: usize = 4;

/// Size of the transport frame length prefix, in bytes.
pub const FRAME_HEADER_LEN: usize = 4;

/// Field carrying the call-completion status in a response.
pub const STATUS_FIELD: &str = "status";

/// Status field name used when a method already has an out/inout parameter named [`STATUS_FIELD`].
pub const RESPONSE_STATUS_FIELD: &str = "response_status";

/// Field carrying a method's return value in a response.
pub const RETURN_VALUE_FIELD: &str = "return_value";

/// Largest element count accepted for a fixed-size `[N]` parameter.
pub const MAX_FIXED_ARRAY_LEN: usize = 4096;

/// Status value reporting a completed call.
pub const STATUS_OK: i32 = 0;

/// Kind of a message in an interface's protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Client-to-server call (or server-to-client push for callback methods).
    Request,
    /// Server-to-client reply to a request.
    Response,
    /// Server-to-client push for an absorbed observer method.
    Notification,
}

impl MessageKind {
    /// Suffix used in message-id constant names.
    pub fn id_suffix(self) -> &'static str {
        match self {
            MessageKind::Request | MessageKind::Notification => "REQ",
            MessageKind::Response => "RESP",
        }
    }

    /// Suffix used in message schema type names.
    pub fn schema_suffix(self) -> &'static str {
        match self {
            MessageKind::Request => "Request",
            MessageKind::Response => "Response",
            MessageKind::Notification => "Notification",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MessageKind::Request => "request",
            MessageKind::Response => "response",
            MessageKind::Notification => "notification",
        };
        f.write_str(s)
    }
}

/// Name of the message-id constant for `method` (e.g. `MSG_ADD_STUDENT_REQ`).
///
/// ## Parameters
/// - `observer`: for notifications, the observer interface that declares `method`.
pub fn message_const_name(method: &str, kind: MessageKind, observer: Option<&str>) -> String {
    let method = crate::naming::to_screaming_snake_case(method);
    match observer {
        Some(owner) => format!(
            "MSG_OBSERVER_{}_{}_{}",
            crate::naming::to_screaming_snake_case(owner),
            method,
            kind.id_suffix()
        ),
        None => format!("MSG_{}_{}", method, kind.id_suffix()),
    }
}
