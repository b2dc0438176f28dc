//! Length-prefixed framing over a byte stream.
//!
//! Each frame is a big-endian `u32` payload length followed by the payload. Readers sit on sockets with a read
//! timeout so their threads can notice shutdown; a timeout before a frame starts is reported as "nothing yet",
//! while a timeout in the middle of a frame just keeps reading.

use std::io::{self, Read, Write};

use sockidl_core::protocol::FRAME_HEADER_LEN;

use crate::errors::{TransportError, WireError};

/// Write one frame and flush.
pub fn write_frame<W: Write>(w: &mut W, payload: &[u8]) -> Result<(), TransportError> {
    let len = u32::try_from(payload.len()).map_err(|_| WireError::LengthOverflow(payload.len()))?;
    w.write_all(&len.to_be_bytes())?;
    w.write_all(payload)?;
    w.flush()?;
    Ok(())
}

/// Reads whole frames from a stream.
#[derive(Debug)]
pub struct FrameReader<R> {
    inner: R,
    max_frame_len: usize,
}

impl<R: Read> FrameReader<R> {
    pub fn new(inner: R, max_frame_len: usize) -> Self {
        Self { inner, max_frame_len }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Read the next frame.
    ///
    /// ## Returns
    /// - `Ok(Some(payload))` for a complete frame.
    /// - `Ok(None)` if the read timed out before any byte of a new frame arrived.
    /// - `Err(TransportError::Closed)` on end of stream.
    pub fn read_frame(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        let mut header = [0u8; FRAME_HEADER_LEN];
        if !self.fill(&mut header, true)? {
            return Ok(None);
        }

        let len = u32::from_be_bytes(header) as usize;
        if len > self.max_frame_len {
            return Err(TransportError::FrameTooLarge {
                len,
                max: self.max_frame_len,
            });
        }

        let mut payload = vec![0u8; len];
        self.fill(&mut payload, false)?;
        Ok(Some(payload))
    }

    /// Fill `buf` completely. Returns `false` only when idle timeouts are allowed and nothing was read.
    fn fill(&mut self, buf: &mut [u8], idle_ok: bool) -> Result<bool, TransportError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => return Err(TransportError::Closed),
                Ok(n) => filled += n,
                Err(e) if is_timeout(&e) => {
                    if filled == 0 && idle_ok {
                        return Ok(false);
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(true)
    }
}

/// Read-timeout errors differ by platform.
pub(crate) fn is_timeout(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
}
