//! Protocol codec
//!
//! Encoding and decoding of request and response frames.
//!
//! ## Wire Format
//!
//! All integers are big-endian.
//!
//! ### Request Format
//! ```text
//! ┌──────────┬─────────────┬─────────┬─────────────┬───────────┐
//! │ Cmd (1)  │ KeyLen (4)  │   Key   │ ValLen (4)  │   Value   │
//! └──────────┴─────────────┴─────────┴─────────────┴───────────┘
//! ```
//! Get and Del still carry `ValLen = 0`, so every request has the same shape.
//!
//! ### Response Format (status-coded)
//! ```text
//! ┌───────────┬──────────┬─────────────────┐
//! │ Status(1) │ Len (4)  │      Body       │   status 200..=202
//! └───────────┴──────────┴─────────────────┘
//! ┌───────────┐
//! │ Status(1) │                                 any other status
//! └───────────┘
//! ```
//!
//! ### Response Format (legacy)
//! ```text
//! ┌──────────┬─────────────────┐
//! │ Len (4)  │      Body       │
//! └──────────┴─────────────────┘
//! ```

use std::io::{Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use super::{Command, Request, Response, ResponseFormat, Status, TagScheme};
use crate::error::{ProtocolError, Result, TransportError};
use crate::transport::{read_exact, read_u32, read_u8, write_exact};

/// Request header: command tag (1) + key length (4)
pub const REQUEST_HEADER_SIZE: usize = 5;

/// Largest response body a peer may announce (10 MiB)
pub const MAX_RESPONSE_SIZE: u32 = 10 * 1024 * 1024;

/// Default cap on request keys (64 KiB)
pub const DEFAULT_MAX_KEY_SIZE: usize = 64 * 1024;

/// Default cap on request values (10 MiB)
pub const DEFAULT_MAX_VALUE_SIZE: usize = 10 * 1024 * 1024;

// =============================================================================
// Frame Limits
// =============================================================================

/// Size caps enforced by the codec
///
/// Response bodies are checked against `max_response_size` before anything
/// is allocated. Request keys and values are checked on both encode and
/// decode, so an oversized request never reaches the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLimits {
    pub max_key_size: usize,
    pub max_value_size: usize,
    pub max_response_size: u32,
}

impl Default for FrameLimits {
    fn default() -> Self {
        Self {
            max_key_size: DEFAULT_MAX_KEY_SIZE,
            max_value_size: DEFAULT_MAX_VALUE_SIZE,
            max_response_size: MAX_RESPONSE_SIZE,
        }
    }
}

impl FrameLimits {
    fn check_request_field(
        field: &'static str,
        len: usize,
        max: usize,
    ) -> std::result::Result<(), ProtocolError> {
        let max = max.min(u32::MAX as usize);
        if len > max {
            return Err(ProtocolError::OversizedRequest { field, len, max });
        }
        Ok(())
    }

    fn check_response(&self, len: u32) -> std::result::Result<(), ProtocolError> {
        if len > self.max_response_size {
            return Err(ProtocolError::OversizedResponse {
                len,
                max: self.max_response_size,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Codec
// =============================================================================

/// Frame encoder/decoder
///
/// Pure translation between values and bytes. The `read_*`/`write_*`
/// methods move whole frames through the byte-exact transport helpers and
/// pass their errors through untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Codec {
    pub format: ResponseFormat,
    pub tags: TagScheme,
    pub limits: FrameLimits,
}

impl Codec {
    pub fn new(format: ResponseFormat, tags: TagScheme, limits: FrameLimits) -> Self {
        Self {
            format,
            tags,
            limits,
        }
    }

    // -------------------------------------------------------------------------
    // Requests
    // -------------------------------------------------------------------------

    /// Encode a request frame
    pub fn encode_request(
        &self,
        request: &Request,
    ) -> std::result::Result<Bytes, ProtocolError> {
        let key = request.key();
        let value = request.value().unwrap_or(&[]);

        FrameLimits::check_request_field("key", key.len(), self.limits.max_key_size)?;
        FrameLimits::check_request_field("value", value.len(), self.limits.max_value_size)?;

        let mut frame =
            BytesMut::with_capacity(REQUEST_HEADER_SIZE + key.len() + 4 + value.len());
        frame.put_u8(self.tags.tag(request.command()));
        frame.put_u32(key.len() as u32);
        frame.put_slice(key);
        frame.put_u32(value.len() as u32);
        frame.put_slice(value);

        Ok(frame.freeze())
    }

    /// Encode and send a request frame
    pub fn write_request<W: Write>(&self, writer: &mut W, request: &Request) -> Result<()> {
        let frame = self.encode_request(request)?;

        tracing::debug!(
            "Sending cmd={}, key_len={}, val_len={}",
            self.tags.tag(request.command()),
            request.key().len(),
            request.value().map_or(0, <[u8]>::len)
        );

        write_exact(writer, &frame, "write request")?;
        writer
            .flush()
            .map_err(|source| TransportError::Write {
                step: "flush request",
                source,
            })?;
        Ok(())
    }

    /// Read one request frame
    ///
    /// A Set with a zero-length value decodes to `Some(vec![])`; a Get or
    /// Del that announces a value is rejected.
    pub fn read_request<R: Read>(&self, reader: &mut R) -> Result<Request> {
        let tag = read_u8(reader, "read cmd")?;
        let command = self
            .tags
            .command(tag)
            .ok_or(ProtocolError::UnknownCommand(tag))?;

        let key_len = read_u32(reader, "read key_len")?;
        FrameLimits::check_request_field("key", key_len as usize, self.limits.max_key_size)?;
        let key = read_exact(reader, key_len as usize, "read key data")?;

        let value_len = read_u32(reader, "read val_len")?;
        if command != Command::Set && value_len != 0 {
            return Err(ProtocolError::UnexpectedValue {
                command: command.name(),
                len: value_len,
            }
            .into());
        }
        FrameLimits::check_request_field(
            "value",
            value_len as usize,
            self.limits.max_value_size,
        )?;
        let value = read_exact(reader, value_len as usize, "read val data")?;

        Ok(match command {
            Command::Set => Request::set(key, value),
            Command::Get => Request::get(key),
            Command::Del => Request::del(key),
        })
    }

    // -------------------------------------------------------------------------
    // Responses
    // -------------------------------------------------------------------------

    /// Encode a response frame
    ///
    /// In the status-coded format a status-only response is a single byte
    /// and any body it carries is not sent. The legacy format has no status
    /// byte, so only the body (or an empty one) is written.
    pub fn encode_response(
        &self,
        response: &Response,
    ) -> std::result::Result<Bytes, ProtocolError> {
        let body = response.body.as_deref().unwrap_or(&[]);
        let len = u32::try_from(body.len()).unwrap_or(u32::MAX);

        let mut frame = BytesMut::with_capacity(1 + 4 + body.len());
        match self.format {
            ResponseFormat::StatusCoded => {
                frame.put_u8(response.status.code());
                if response.status.has_body() {
                    self.limits.check_response(len)?;
                    frame.put_u32(len);
                    frame.put_slice(body);
                }
            }
            ResponseFormat::Legacy => {
                self.limits.check_response(len)?;
                frame.put_u32(len);
                frame.put_slice(body);
            }
        }

        Ok(frame.freeze())
    }

    /// Encode and send a response frame
    pub fn write_response<W: Write>(&self, writer: &mut W, response: &Response) -> Result<()> {
        let frame = self.encode_response(response)?;
        write_exact(writer, &frame, "write response")?;
        writer
            .flush()
            .map_err(|source| TransportError::Write {
                step: "flush response",
                source,
            })?;
        Ok(())
    }

    /// Read one response frame
    ///
    /// For a status outside 200..=202 nothing past the status byte is
    /// consumed. A declared body length above the cap fails before the body
    /// is allocated or read.
    pub fn read_response<R: Read>(&self, reader: &mut R) -> Result<Response> {
        let status = match self.format {
            ResponseFormat::StatusCoded => {
                let status = Status(read_u8(reader, "read resp status")?);
                tracing::info!("Received response status: {}", status);
                if !status.has_body() {
                    return Ok(Response { status, body: None });
                }
                status
            }
            ResponseFormat::Legacy => Status::OK,
        };

        let len = read_u32(reader, "read resp size")?;
        self.limits.check_response(len)?;
        let body = read_exact(reader, len as usize, "read resp data")?;
        tracing::debug!("Received {} byte body", len);

        Ok(Response {
            status,
            body: Some(body),
        })
    }
}
