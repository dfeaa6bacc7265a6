//! Error types for kvlink
//!
//! Provides a unified error type for all operations, layered over the
//! transport and protocol failure kinds.

use std::io;

use thiserror::Error;

/// Result type alias using KvError
pub type Result<T> = std::result::Result<T, KvError>;

/// Unified error type for kvlink operations
#[derive(Debug, Error)]
pub enum KvError {
    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("connect {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("connection is closed after a previous failure")]
    ConnectionClosed,

    // -------------------------------------------------------------------------
    // Wire Errors
    // -------------------------------------------------------------------------
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Benchmark Errors
    // -------------------------------------------------------------------------
    #[error("benchmark worker panicked")]
    WorkerPanic,
}

/// Failure of a byte-exact read or write
///
/// `step` names what was being transferred (e.g. "read resp size").
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{step}: {source}")]
    Read {
        step: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("{step}: {source}")]
    Write {
        step: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("{step}: unexpected EOF after {received} of {expected} bytes")]
    UnexpectedEof {
        step: &'static str,
        expected: usize,
        received: usize,
    },
}

impl TransportError {
    /// The step label of the failed transfer
    pub fn step(&self) -> &'static str {
        match self {
            TransportError::Read { step, .. }
            | TransportError::Write { step, .. }
            | TransportError::UnexpectedEof { step, .. } => step,
        }
    }
}

/// Frame-level violations of the wire protocol
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("response too large: {len} bytes (max {max})")]
    OversizedResponse { len: u32, max: u32 },

    #[error("request {field} too large: {len} bytes (max {max})")]
    OversizedRequest {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("unknown command tag: {0}")]
    UnknownCommand(u8),

    #[error("{command} request carries a {len}-byte value")]
    UnexpectedValue { command: &'static str, len: u32 },

    #[error("status {0} carries no body")]
    StatusWithoutBody(u8),

    #[error("status {0} requires a body")]
    StatusRequiresBody(u8),
}
