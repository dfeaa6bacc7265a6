//! Client Connection
//!
//! Owns one TCP connection and drives request/response exchanges over it.

use std::io::{BufReader, BufWriter};
use std::net::{Shutdown, TcpStream};

use crate::config::ClientConfig;
use crate::error::{KvError, Result, TransportError};
use crate::protocol::{Codec, Request, Response};

/// Lifecycle of a connection
///
/// ```text
/// Connected --send--> AwaitingResponse --response read--> Connected
///     any state --error--> Closed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    AwaitingResponse,
    Closed,
}

/// A single client connection
///
/// One exchange at a time: `execute` takes `&mut self`, so a second request
/// cannot be sent before the previous response has been read. Share across
/// threads only behind external synchronization; for parallel load, open
/// one connection per worker.
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Frame encoder/decoder
    codec: Codec,

    /// Current lifecycle state
    state: ConnectionState,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Open a connection to the configured server
    ///
    /// Resolution and connect failures are reported as `KvError::Connect`.
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        let addr = config.addr();
        let connect_err = |source: std::io::Error| KvError::Connect {
            addr: addr.clone(),
            source,
        };

        // Tries every resolved address in turn
        let stream = TcpStream::connect(addr.as_str()).map_err(connect_err)?;

        stream.set_nodelay(config.nodelay).map_err(connect_err)?;
        stream.set_read_timeout(config.read_timeout).map_err(connect_err)?;
        stream.set_write_timeout(config.write_timeout).map_err(connect_err)?;

        tracing::debug!("Connected to {}", addr);
        Self::from_stream(stream, config.codec()).map_err(connect_err)
    }

    /// Wrap an already connected stream
    pub fn from_stream(stream: TcpStream, codec: Codec) -> std::io::Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
            codec,
            state: ConnectionState::Connected,
            peer_addr,
        })
    }

    /// Send one request and read its response
    ///
    /// On success exactly one frame was written and one read, and the
    /// connection may be reused. On failure the connection moves to
    /// `Closed` and every later call returns `KvError::ConnectionClosed`.
    pub fn execute(&mut self, request: &Request) -> Result<Response> {
        if self.state != ConnectionState::Connected {
            return Err(KvError::ConnectionClosed);
        }

        match self.exchange(request) {
            Ok(response) => {
                self.state = ConnectionState::Connected;
                Ok(response)
            }
            Err(e) => {
                tracing::debug!("Exchange with {} failed: {}", self.peer_addr, e);
                self.state = ConnectionState::Closed;
                Err(e)
            }
        }
    }

    fn exchange(&mut self, request: &Request) -> Result<Response> {
        self.codec.write_request(&mut self.writer, request)?;
        self.state = ConnectionState::AwaitingResponse;
        self.codec.read_response(&mut self.reader)
    }

    /// Store `value` under `key`
    pub fn set(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Result<Response> {
        self.execute(&Request::set(key, value))
    }

    /// Fetch the value for `key`
    pub fn get(&mut self, key: impl Into<Vec<u8>>) -> Result<Response> {
        self.execute(&Request::get(key))
    }

    /// Remove `key`
    pub fn del(&mut self, key: impl Into<Vec<u8>>) -> Result<Response> {
        self.execute(&Request::del(key))
    }

    /// Shut the socket down in both directions
    pub fn close(self) -> Result<()> {
        match self.writer.get_ref().shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            Err(source) => Err(TransportError::Write {
                step: "shutdown",
                source,
            }
            .into()),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Whether another `execute` may be attempted
    pub fn is_usable(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}
