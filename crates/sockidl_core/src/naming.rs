//! Identifier conventions for turning IDL names into Rust names.
//!
//! IDL sources are usually written in `camelCase` for methods and fields. Generated Rust uses `snake_case`
//! for functions, fields, and parameters, `SCREAMING_SNAKE_CASE` for message-id constants, and keeps type
//! names (interfaces, structs, enums, enum values) exactly as declared.
//!
//! ## Examples
//! ```rust
//! use sockidl_core::naming;
//!
//! assert_eq!(naming::to_snake_case("addStudent"), "add_student");
//! assert_eq!(naming::to_snake_case("getHTTPStatus"), "get_http_status");
//! assert_eq!(naming::to_screaming_snake_case("onKeyChanged"), "ON_KEY_CHANGED");
//! assert_eq!(naming::to_upper_camel_case("key_value_store"), "KeyValueStore");
//! ```

use crate::lang::rust_keywords;

/// Convert `camelCase`, `PascalCase`, or `snake_case` into `snake_case`.
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_ascii_uppercase() => next.is_some_and(|n| n.is_ascii_lowercase()),
                _ => false,
            };
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert any supported spelling into `SCREAMING_SNAKE_CASE`.
pub fn to_screaming_snake_case(name: &str) -> String {
    to_snake_case(name).to_ascii_uppercase()
}

/// Convert `snake_case` or `camelCase` into `UpperCamelCase`.
pub fn to_upper_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = true;
    for c in name.chars() {
        if c == '_' {
            upper_next = true;
            continue;
        }
        if upper_next {
            out.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Method names (in `snake_case`) taken by the generated client, server, and service APIs.
///
/// An IDL method with one of these names is emitted with a trailing underscore.
pub const RESERVED_METHOD_NAMES: &[&str] = &[
    "new",
    "default",
    "with_config",
    "with_events",
    "with_events_and_config",
    "connect",
    "connect_to",
    "disconnect",
    "state",
    "is_connected",
    "start_listening",
    "stop_listening",
    "core",
    "service",
    "start",
    "start_on",
    "run",
    "stop",
    "is_running",
    "client_count",
    "local_addr",
    "on_client_connected",
    "on_client_disconnected",
];

/// Whether a method named `name` would collide with a generated API method.
pub fn is_reserved_method_name(name: &str) -> bool {
    RESERVED_METHOD_NAMES.contains(&to_snake_case(name).as_str())
}

/// How an identifier must be spelled to be legal in Rust source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RustIdent {
    /// Usable as-is.
    Plain(String),
    /// A Rust keyword that must be written as a raw identifier (`r#type`).
    Raw(String),
}

impl RustIdent {
    /// The identifier text without any `r#` prefix.
    pub fn text(&self) -> &str {
        match self {
            RustIdent::Plain(s) | RustIdent::Raw(s) => s,
        }
    }
}

/// Classify `name` for emission, renaming the few keywords that cannot be raw identifiers.
pub fn rust_ident(name: &str) -> RustIdent {
    if rust_keywords::NON_RAW_KEYWORDS.contains(&name) {
        RustIdent::Plain(format!("{name}_"))
    } else if rust_keywords::is_keyword(name) {
        RustIdent::Raw(name.to_string())
    } else {
        RustIdent::Plain(name.to_string())
    }
}
