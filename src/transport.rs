//! Transport
//!
//! Byte-exact blocking I/O over a connected stream.
//!
//! A single `read`/`write` call on a socket may move fewer bytes than asked
//! for. These helpers loop until the whole buffer has been transferred.
//! `Interrupted` is the only error that is retried; everything else,
//! including a peer closing the stream mid-frame, fails the call.
//!
//! No timeouts are applied here. A stalled peer blocks the caller until the
//! socket's own timeouts (if any were configured) fire.

use std::io::{self, ErrorKind, Read, Write};

use crate::error::TransportError;

/// Write all of `bytes` to `writer`
pub fn write_exact<W: Write>(
    writer: &mut W,
    bytes: &[u8],
    step: &'static str,
) -> Result<(), TransportError> {
    let mut written = 0;

    while written < bytes.len() {
        match writer.write(&bytes[written..]) {
            Ok(0) => {
                return Err(TransportError::Write {
                    step,
                    source: io::Error::new(ErrorKind::WriteZero, "stream accepted zero bytes"),
                })
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(source) => return Err(TransportError::Write { step, source }),
        }
    }

    Ok(())
}

/// Fill `buf` completely from `reader`
///
/// End-of-stream before the buffer is full yields `UnexpectedEof` with the
/// number of bytes that did arrive.
pub fn read_exact_into<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
    step: &'static str,
) -> Result<(), TransportError> {
    let mut filled = 0;

    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(TransportError::UnexpectedEof {
                    step,
                    expected: buf.len(),
                    received: filled,
                })
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(source) => return Err(TransportError::Read { step, source }),
        }
    }

    Ok(())
}

/// Read exactly `n` bytes from `reader` into a new buffer
pub fn read_exact<R: Read>(
    reader: &mut R,
    n: usize,
    step: &'static str,
) -> Result<Vec<u8>, TransportError> {
    let mut buf = vec![0u8; n];
    read_exact_into(reader, &mut buf, step)?;
    Ok(buf)
}

/// Read a big-endian `u32`
pub(crate) fn read_u32<R: Read>(reader: &mut R, step: &'static str) -> Result<u32, TransportError> {
    let mut raw = [0u8; 4];
    read_exact_into(reader, &mut raw, step)?;
    Ok(u32::from_be_bytes(raw))
}

/// Read a single byte
pub(crate) fn read_u8<R: Read>(reader: &mut R, step: &'static str) -> Result<u8, TransportError> {
    let mut raw = [0u8; 1];
    read_exact_into(reader, &mut raw, step)?;
    Ok(raw[0])
}
