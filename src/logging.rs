//! Logging setup
//!
//! Builds a timestamped `tracing` subscriber for a chosen minimum level.
//! The subscriber is returned as a value; callers decide its scope with
//! `tracing::subscriber::with_default` instead of mutating process state.

use clap::ValueEnum;
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;

/// Minimum severity of emitted log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Filter directive for this level
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Subscriber writing to stderr at `level`
///
/// `RUST_LOG`, when set, takes precedence over `level`.
pub fn subscriber(level: LogLevel) -> impl Subscriber + Send + Sync + 'static {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish()
}
