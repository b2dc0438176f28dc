//! Built-in primitive types of the IDL.
//!
//! Each entry ties an IDL spelling (plus accepted aliases) to the Rust type generated code uses and to its
//! encoded size on the wire. The wire sizes here are part of the cross-process contract: changing them breaks
//! compatibility between independently generated clients and servers.
//!
//! ## Notes
//! - All primitive spellings are reserved words; the lexer emits them as `TokenKind::Primitive`.
//! - `char` is a single byte on the wire and maps to `u8`, not to Rust's 4-byte `char`.
//! - [`PRIMITIVES`] is ordered exactly like [`PrimitiveId`].
//!
//! ## Examples
//! ```rust
//! use sockidl_core::lang::primitives::{self, PrimitiveId};
//!
//! assert_eq!(primitives::from_str("long"), Some(PrimitiveId::I64));
//! assert_eq!(primitives::from_str("uint16_t"), Some(PrimitiveId::U16));
//! assert_eq!(primitives::rust_type(PrimitiveId::F64), "f64");
//! assert_eq!(primitives::wire_size(PrimitiveId::I64), Some(8));
//! ```

/// Stable identifier for a primitive type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveId {
    Void,
    Bool,
    Char,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    String,
}

/// How a primitive is laid out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireLayout {
    /// Carries no bytes (only valid as a return type).
    Empty,
    /// Fixed number of big-endian bytes.
    Fixed(usize),
    /// 4-byte length prefix followed by that many bytes.
    LengthPrefixed,
}

/// Metadata for a primitive type.
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveInfo {
    pub id: PrimitiveId,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub rust_type: &'static str,
    pub layout: WireLayout,
}

/// Registry of all primitive types, in [`PrimitiveId`] declaration order.
pub const PRIMITIVES: &[PrimitiveInfo] = &[
    info(PrimitiveId::Void, "void", &[], "()", WireLayout::Empty),
    info(PrimitiveId::Bool, "bool", &["boolean"], "bool", WireLayout::Fixed(1)),
    info(PrimitiveId::Char, "char", &[], "u8", WireLayout::Fixed(1)),
    info(PrimitiveId::I8, "int8", &["int8_t"], "i8", WireLayout::Fixed(1)),
    info(PrimitiveId::U8, "byte", &["octet", "uint8", "uint8_t"], "u8", WireLayout::Fixed(1)),
    info(PrimitiveId::I16, "short", &["int16", "int16_t"], "i16", WireLayout::Fixed(2)),
    info(PrimitiveId::U16, "ushort", &["uint16", "uint16_t"], "u16", WireLayout::Fixed(2)),
    info(PrimitiveId::I32, "int", &["int32", "int32_t"], "i32", WireLayout::Fixed(4)),
    info(PrimitiveId::U32, "uint", &["uint32", "uint32_t"], "u32", WireLayout::Fixed(4)),
    info(PrimitiveId::I64, "long", &["int64", "int64_t"], "i64", WireLayout::Fixed(8)),
    info(PrimitiveId::U64, "ulong", &["uint64", "uint64_t"], "u64", WireLayout::Fixed(8)),
    info(PrimitiveId::F32, "float", &[], "f32", WireLayout::Fixed(4)),
    info(PrimitiveId::F64, "double", &[], "f64", WireLayout::Fixed(8)),
    info(PrimitiveId::String, "string", &[], "String", WireLayout::LengthPrefixed),
];

/// Canonical IDL spelling of a primitive.
pub fn as_str(id: PrimitiveId) -> &'static str {
    info_for(id).canonical
}

/// Rust type that generated code uses for a primitive.
pub fn rust_type(id: PrimitiveId) -> &'static str {
    info_for(id).rust_type
}

/// Encoded size in bytes for fixed-width primitives.
///
/// ## Returns
/// - `Some(n)` for fixed-width types (`Some(0)` for `void`), `None` for `string`.
pub fn wire_size(id: PrimitiveId) -> Option<usize> {
    match info_for(id).layout {
        WireLayout::Empty => Some(0),
        WireLayout::Fixed(n) => Some(n),
        WireLayout::LengthPrefixed => None,
    }
}

/// Full metadata for a primitive.
pub fn info_for(id: PrimitiveId) -> &'static PrimitiveInfo {
    &PRIMITIVES[id as usize]
}

/// Lookup by spelling (canonical or alias).
pub fn from_str(s: &str) -> Option<PrimitiveId> {
    PRIMITIVES
        .iter()
        .find(|p| p.canonical == s || p.aliases.contains(&s))
        .map(|p| p.id)
}

impl PrimitiveId {
    /// Whether this is `void`.
    pub fn is_void(self) -> bool {
        self == PrimitiveId::Void
    }
}

const fn info(
    id: PrimitiveId,
    canonical: &'static str,
    aliases: &'static [&'static str],
    rust_type: &'static str,
    layout: WireLayout,
) -> PrimitiveInfo {
    PrimitiveInfo {
        id,
        canonical,
        aliases,
        rust_type,
        layout,
    }
}
