//! Response definitions
//!
//! Represents the responses a server sends back.

use std::fmt;

use clap::ValueEnum;

use crate::error::ProtocolError;

/// One-byte response status
///
/// Only 200, 201 and 202 are followed by a body. Every other byte is a
/// status-only outcome whose meaning is up to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status(pub u8);

impl Status {
    pub const OK: Status = Status(200);
    pub const CREATED: Status = Status(201);
    pub const ACCEPTED: Status = Status(202);

    /// Whether a length-prefixed body follows this status on the wire
    pub fn has_body(self) -> bool {
        matches!(self.0, 200..=202)
    }

    pub fn code(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shape of response frames on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ResponseFormat {
    /// `uint32 length` + body, no status byte
    Legacy,

    /// Status byte, then `uint32 length` + body for payload-bearing statuses
    #[default]
    #[value(name = "status")]
    StatusCoded,
}

/// A decoded response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status code
    pub status: Status,

    /// Body, present iff `status.has_body()`
    pub body: Option<Vec<u8>>,
}

impl Response {
    /// A payload-bearing response; `status` must be one of 200..=202
    pub fn with_body(
        status: Status,
        body: impl Into<Vec<u8>>,
    ) -> Result<Self, ProtocolError> {
        if !status.has_body() {
            return Err(ProtocolError::StatusWithoutBody(status.code()));
        }
        Ok(Self {
            status,
            body: Some(body.into()),
        })
    }

    /// A status-only response; `status` must be outside 200..=202
    pub fn status_only(status: Status) -> Result<Self, ProtocolError> {
        if status.has_body() {
            return Err(ProtocolError::StatusRequiresBody(status.code()));
        }
        Ok(Self { status, body: None })
    }

    /// A 200 response carrying `body`
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: Status::OK,
            body: Some(body.into()),
        }
    }

    /// Whether the status is one of the payload-bearing codes
    pub fn is_success(&self) -> bool {
        self.status.has_body()
    }
}
