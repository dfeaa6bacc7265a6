//! Network Module
//!
//! TCP connection handling for the client side.
//!
//! ## Usage Patterns
//! - Ephemeral: `request_once` opens a connection, runs one exchange, closes it
//! - Reused: hold a `Connection` and call `execute` repeatedly, strictly
//!   one request at a time

mod connection;

pub use connection::{Connection, ConnectionState};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::protocol::{Request, Response};

/// Run a single exchange on a fresh connection
pub fn request_once(config: &ClientConfig, request: &Request) -> Result<Response> {
    let mut connection = Connection::connect(config)?;
    let response = connection.execute(request)?;
    // The response is complete; a failed shutdown doesn't change it
    if let Err(e) = connection.close() {
        tracing::debug!("Closing connection failed: {}", e);
    }
    Ok(response)
}
