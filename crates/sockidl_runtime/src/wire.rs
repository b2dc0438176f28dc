//! Payload encoding.
//!
//! Every payload starts with a big-endian `u32` message id followed by the message's fields in declaration
//! order:
//!
//! | type                      | encoding                                              |
//! |---------------------------|-------------------------------------------------------|
//! | `i8`/`u8`/`bool`          | 1 byte (`bool` decodes any non-zero byte as `true`)   |
//! | `i16`/`u16`               | 2 bytes, big-endian                                   |
//! | `i32`/`u32`/`f32`         | 4 bytes, big-endian (`f32` as its IEEE-754 bits)      |
//! | `i64`/`u64`/`f64`         | two big-endian `u32` halves, high half first          |
//! | `String`                  | `u32` byte length, then UTF-8 bytes                   |
//! | `Vec<T>`                  | `u32` element count, then each element                |
//! | `[T; N]`                  | `N` elements, no prefix                               |
//! | enums                     | `i32` ordinal                                         |
//! | structs                   | fields in declaration order                           |
//!
//! ## Examples
//! ```rust
//! use sockidl_runtime::wire::{ByteReader, ByteWriter, Wire};
//!
//! let mut w = ByteWriter::new();
//! 42u64.encode(&mut w).unwrap();
//! "hi".to_string().encode(&mut w).unwrap();
//!
//! let bytes = w.into_bytes();
//! let mut r = ByteReader::new(&bytes);
//! assert_eq!(u64::decode(&mut r).unwrap(), 42);
//! assert_eq!(String::decode(&mut r).unwrap(), "hi");
//! ```

use sockidl_core::protocol::MESSAGE_ID_LEN;

use crate::errors::WireError;

// ============================================================================
// Writer / reader
// ============================================================================

/// Growable big-endian output buffer.
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_i8(&mut self, v: i8) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_i16(&mut self, v: i16) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    /// High 32 bits first, then low 32 bits.
    pub fn write_u64(&mut self, v: u64) {
        self.write_u32((v >> 32) as u32);
        self.write_u32(v as u32);
    }

    pub fn write_i64(&mut self, v: i64) {
        self.write_u64(v as u64);
    }

    pub fn write_f32(&mut self, v: f32) {
        self.write_u32(v.to_bits());
    }

    pub fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    pub fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    /// Write a `u32` length or count prefix.
    pub fn write_len(&mut self, len: usize) -> Result<(), WireError> {
        let len = u32::try_from(len).map_err(|_| WireError::LengthOverflow(len))?;
        self.write_u32(len);
        Ok(())
    }

    pub fn write_str(&mut self, s: &str) -> Result<(), WireError> {
        self.write_len(s.len())?;
        self.buf.extend_from_slice(s.as_bytes());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Bounds-checked big-endian reader over a borrowed payload.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Consume exactly `n` bytes.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], WireError> {
        if n > self.remaining() {
            return Err(WireError::Underflow {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], WireError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, WireError> {
        Ok(self.take_array::<1>()?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, WireError> {
        Ok(i8::from_be_bytes(self.take_array()?))
    }

    pub fn read_u16(&mut self) -> Result<u16, WireError> {
        Ok(u16::from_be_bytes(self.take_array()?))
    }

    pub fn read_i16(&mut self) -> Result<i16, WireError> {
        Ok(i16::from_be_bytes(self.take_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, WireError> {
        Ok(u32::from_be_bytes(self.take_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, WireError> {
        Ok(i32::from_be_bytes(self.take_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, WireError> {
        let high = u64::from(self.read_u32()?);
        let low = u64::from(self.read_u32()?);
        Ok((high << 32) | low)
    }

    pub fn read_i64(&mut self) -> Result<i64, WireError> {
        Ok(self.read_u64()? as i64)
    }

    pub fn read_f32(&mut self) -> Result<f32, WireError> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    pub fn read_f64(&mut self) -> Result<f64, WireError> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    pub fn read_bool(&mut self) -> Result<bool, WireError> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_len(&mut self) -> Result<usize, WireError> {
        Ok(self.read_u32()? as usize)
    }

    pub fn read_string(&mut self) -> Result<String, WireError> {
        let len = self.read_len()?;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| WireError::InvalidUtf8)
    }
}

// ============================================================================
// Wire trait
// ============================================================================

/// A value with a wire encoding.
///
/// Generated enums and structs implement this; the runtime covers primitives, strings, sequences and fixed
/// arrays.
pub trait Wire: Sized {
    fn encode(&self, w: &mut ByteWriter) -> Result<(), WireError>;
    fn decode(r: &mut ByteReader<'_>) -> Result<Self, WireError>;
}

macro_rules! impl_wire_primitive {
    ($($ty:ty => $write:ident, $read:ident;)*) => {
        $(
            impl Wire for $ty {
                fn encode(&self, w: &mut ByteWriter) -> Result<(), WireError> {
                    w.$write(*self);
                    Ok(())
                }

                fn decode(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
                    r.$read()
                }
            }
        )*
    };
}

impl_wire_primitive! {
    u8 => write_u8, read_u8;
    i8 => write_i8, read_i8;
    u16 => write_u16, read_u16;
    i16 => write_i16, read_i16;
    u32 => write_u32, read_u32;
    i32 => write_i32, read_i32;
    u64 => write_u64, read_u64;
    i64 => write_i64, read_i64;
    f32 => write_f32, read_f32;
    f64 => write_f64, read_f64;
    bool => write_bool, read_bool;
}

impl Wire for String {
    fn encode(&self, w: &mut ByteWriter) -> Result<(), WireError> {
        w.write_str(self)
    }

    fn decode(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
        r.read_string()
    }
}

impl<T: Wire> Wire for Vec<T> {
    fn encode(&self, w: &mut ByteWriter) -> Result<(), WireError> {
        w.write_len(self.len())?;
        for item in self {
            item.encode(w)?;
        }
        Ok(())
    }

    fn decode(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
        let count = r.read_len()?;
        // A hostile count must not drive the allocation.
        let mut items = Vec::with_capacity(count.min(r.remaining()));
        for _ in 0..count {
            let before = r.remaining();
            items.push(T::decode(r)?);
            // Zero-width elements cannot account for a count larger than the payload.
            if r.remaining() == before && count > before {
                return Err(WireError::ZeroWidthCount { count, remaining: before });
            }
        }
        Ok(items)
    }
}

impl<T: Wire, const N: usize> Wire for [T; N] {
    fn encode(&self, w: &mut ByteWriter) -> Result<(), WireError> {
        for item in self {
            item.encode(w)?;
        }
        Ok(())
    }

    fn decode(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
        let mut items = Vec::with_capacity(N.min(r.remaining()));
        for _ in 0..N {
            items.push(T::decode(r)?);
        }
        let found = items.len();
        items.try_into().map_err(|_| WireError::ArrayLength { expected: N, found })
    }
}

// ============================================================================
// Messages
// ============================================================================

/// A request, response or notification schema with a fixed message id.
pub trait Message: Sized {
    const ID: u32;

    /// Encode the fields (not the id).
    fn encode_fields(&self, w: &mut ByteWriter) -> Result<(), WireError>;

    /// Decode the fields (the id has already been consumed).
    fn decode_fields(r: &mut ByteReader<'_>) -> Result<Self, WireError>;

    /// Full payload: id followed by the fields.
    fn to_payload(&self) -> Result<Vec<u8>, WireError> {
        let mut w = ByteWriter::with_capacity(64);
        w.write_u32(Self::ID);
        self.encode_fields(&mut w)?;
        Ok(w.into_bytes())
    }

    /// Decode a full payload, rejecting one that carries a different id.
    fn from_payload(payload: &[u8]) -> Result<Self, WireError> {
        let mut r = ByteReader::new(payload);
        let found = r.read_u32()?;
        if found != Self::ID {
            return Err(WireError::UnexpectedMessage {
                expected: Self::ID,
                found,
            });
        }
        Self::decode_fields(&mut r)
    }
}

/// Read the message id at the start of `payload` without consuming anything.
pub fn peek_message_id(payload: &[u8]) -> Result<u32, WireError> {
    let header = payload.get(..MESSAGE_ID_LEN).ok_or(WireError::Underflow {
        needed: MESSAGE_ID_LEN,
        remaining: payload.len(),
    })?;
    ByteReader::new(header).read_u32()
}
