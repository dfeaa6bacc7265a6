//! Configuration for kvlink
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

use crate::protocol::{Codec, FrameLimits, ResponseFormat, TagScheme};

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 6969;

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Server host name or address
    pub host: String,

    /// Server TCP port
    pub port: u16,

    /// Disable Nagle's algorithm on the socket
    pub nodelay: bool,

    /// Socket read timeout; `None` blocks forever
    pub read_timeout: Option<Duration>,

    /// Socket write timeout; `None` blocks forever
    pub write_timeout: Option<Duration>,

    // -------------------------------------------------------------------------
    // Wire Configuration
    // -------------------------------------------------------------------------
    /// Response frame shape the server speaks
    pub response_format: ResponseFormat,

    /// Command tag mapping the server expects
    pub tag_scheme: TagScheme,

    /// Size caps for requests and responses
    pub limits: FrameLimits,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            nodelay: true,
            read_timeout: None,
            write_timeout: None,
            response_format: ResponseFormat::default(),
            tag_scheme: TagScheme::default(),
            limits: FrameLimits::default(),
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// `host:port` as passed to address resolution
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Codec matching this configuration
    pub fn codec(&self) -> Codec {
        Codec::new(self.response_format, self.tag_scheme, self.limits)
    }
}

/// Builder for ClientConfig
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the server host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Enable or disable TCP_NODELAY
    pub fn nodelay(mut self, nodelay: bool) -> Self {
        self.config.nodelay = nodelay;
        self
    }

    /// Set the socket read timeout
    pub fn read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.read_timeout = timeout;
        self
    }

    /// Set the socket write timeout
    pub fn write_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.write_timeout = timeout;
        self
    }

    /// Set the response frame format
    pub fn response_format(mut self, format: ResponseFormat) -> Self {
        self.config.response_format = format;
        self
    }

    /// Set the command tag scheme
    pub fn tag_scheme(mut self, tags: TagScheme) -> Self {
        self.config.tag_scheme = tags;
        self
    }

    /// Set the frame size limits
    pub fn limits(mut self, limits: FrameLimits) -> Self {
        self.config.limits = limits;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}

// =============================================================================
// Benchmark Configuration
// =============================================================================

/// How benchmark workers use connections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionMode {
    /// Open and close a connection for every operation
    #[default]
    Ephemeral,

    /// Keep one connection per worker for the whole phase
    Persistent,
}

/// Benchmark driver configuration
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Target server and wire settings
    pub client: ClientConfig,

    /// Timed operations per command
    pub ops: usize,

    /// Untimed operations per command before the timed run
    pub warmup_ops: usize,

    /// Concurrent workers, each with its own connection
    pub workers: usize,

    /// Connection reuse policy
    pub mode: ConnectionMode,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            ops: 1000,
            warmup_ops: 10,
            workers: 1,
            mode: ConnectionMode::default(),
        }
    }
}

impl BenchConfig {
    /// Create a new config builder
    pub fn builder() -> BenchConfigBuilder {
        BenchConfigBuilder::default()
    }
}

/// Builder for BenchConfig
#[derive(Default)]
pub struct BenchConfigBuilder {
    config: BenchConfig,
}

impl BenchConfigBuilder {
    /// Set the client configuration
    pub fn client(mut self, client: ClientConfig) -> Self {
        self.config.client = client;
        self
    }

    /// Set the number of timed operations per command
    pub fn ops(mut self, ops: usize) -> Self {
        self.config.ops = ops;
        self
    }

    /// Set the number of warm-up operations per command
    pub fn warmup_ops(mut self, ops: usize) -> Self {
        self.config.warmup_ops = ops;
        self
    }

    /// Set the number of concurrent workers
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Set the connection reuse policy
    pub fn mode(mut self, mode: ConnectionMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn build(self) -> BenchConfig {
        self.config
    }
}
