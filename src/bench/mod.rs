//! Benchmark Module
//!
//! In-process load generator for a running server.
//!
//! ## Workload
//! - Phases: Set, Get, Del, in that order
//! - Each phase: `warmup_ops` untimed operations, then `ops` timed ones
//! - Operation `i` targets key `key{i}` (and value `value{i}` for Set)
//! - Workers each own their connection(s); none are shared

mod driver;
mod stats;

pub use driver::{request_for, BenchDriver, MAX_WORKERS};
pub use stats::{LatencyRecorder, LatencySummary, PhaseReport};
