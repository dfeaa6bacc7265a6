//! # kvlink
//!
//! Client for a small binary key-value protocol over TCP:
//! - Byte-exact blocking transport (partial reads/writes, EINTR retry)
//! - Frame codec for requests and status-coded or legacy responses
//! - Connection with a strict one-request-at-a-time lifecycle
//! - In-process benchmark driver with a worker pool
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              kvlink-cli / kvlink-bench                       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Request
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  Connection (network)                        │
//! │        Connected → AwaitingResponse → Connected | Closed     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Codec    │ ───────▶ │  Transport  │ ───▶ TCP
//!   │  (frames)   │          │ (exact I/O) │
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use kvlink::{ClientConfig, Connection};
//!
//! let config = ClientConfig::builder().host("127.0.0.1").port(6969).build();
//! let mut conn = Connection::connect(&config)?;
//! conn.set("foo", "bar")?;
//! let response = conn.get("foo")?;
//! assert_eq!(response.body.as_deref(), Some(&b"bar"[..]));
//! # Ok::<(), kvlink::KvError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod logging;

pub mod transport;
pub mod protocol;
pub mod network;
pub mod bench;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KvError, ProtocolError, Result, TransportError};
pub use config::{BenchConfig, ClientConfig, ConnectionMode, DEFAULT_PORT};
pub use network::{request_once, Connection};
pub use protocol::{Command, Request, Response, ResponseFormat, Status};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of kvlink
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
