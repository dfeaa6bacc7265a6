//! Latency aggregation
//!
//! Workers time their own operations and hand the samples over in one
//! batch when they finish, so the shared lock is taken once per worker.

use std::fmt;
use std::time::Duration;

use parking_lot::Mutex;

use crate::protocol::Command;

/// Shared sink for per-operation latencies
#[derive(Default)]
pub struct LatencyRecorder {
    inner: Mutex<Samples>,
}

#[derive(Default)]
struct Samples {
    latencies: Vec<Duration>,
    errors: usize,
}

impl LatencyRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a worker's successful latencies and its error count
    pub fn record_batch(&self, latencies: Vec<Duration>, errors: usize) {
        let mut inner = self.inner.lock();
        inner.latencies.extend(latencies);
        inner.errors += errors;
    }

    /// Number of successful samples so far
    pub fn len(&self) -> usize {
        self.inner.lock().latencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build the report for a finished phase
    pub fn report(&self, command: Command, ops: usize, elapsed: Duration) -> PhaseReport {
        let mut inner = self.inner.lock();
        inner.latencies.sort_unstable();

        PhaseReport {
            command,
            ops,
            errors: inner.errors,
            elapsed,
            latency: LatencySummary::from_sorted(&inner.latencies),
        }
    }
}

/// Latency distribution of successful operations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LatencySummary {
    pub min: Duration,
    pub mean: Duration,
    pub p50: Duration,
    pub p90: Duration,
    pub p99: Duration,
    pub max: Duration,
}

impl LatencySummary {
    /// Summarize ascending samples; all zero when there are none
    pub fn from_sorted(sorted: &[Duration]) -> Self {
        let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
            return Self::default();
        };

        Self {
            min,
            mean: mean(sorted),
            p50: percentile(sorted, 50.0),
            p90: percentile(sorted, 90.0),
            p99: percentile(sorted, 99.0),
            max,
        }
    }
}

/// Exact mean in nanoseconds; neither the sum nor the count can overflow
fn mean(samples: &[Duration]) -> Duration {
    let total: u128 = samples.iter().map(Duration::as_nanos).sum();
    let nanos = total / samples.len() as u128;
    // Never above the largest sample, so the seconds fit in a u64
    Duration::new((nanos / NANOS_PER_SEC) as u64, (nanos % NANOS_PER_SEC) as u32)
}

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Nearest-rank percentile of a non-empty ascending slice
fn percentile(sorted: &[Duration], pct: f64) -> Duration {
    let rank = (pct * sorted.len() as f64 / 100.0).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

/// Outcome of one benchmark phase
#[derive(Debug, Clone)]
pub struct PhaseReport {
    pub command: Command,

    /// Operations attempted in the timed run
    pub ops: usize,

    /// Operations that failed
    pub errors: usize,

    /// Wall-clock time of the timed run
    pub elapsed: Duration,

    pub latency: LatencySummary,
}

impl PhaseReport {
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    /// Throughput over the wall-clock interval
    pub fn ops_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.ops as f64 / secs
    }

    /// Wall-clock milliseconds per operation
    pub fn avg_ms_per_op(&self) -> f64 {
        if self.ops == 0 {
            return 0.0;
        }
        self.elapsed_ms() / self.ops as f64
    }
}

impl fmt::Display for PhaseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = |d: Duration| d.as_secs_f64() * 1000.0;

        writeln!(
            f,
            "CMD_{}: {} ops in {:.2} ms ({:.2} ops/sec, avg {:.2} ms/op)",
            self.command,
            self.ops,
            self.elapsed_ms(),
            self.ops_per_sec(),
            self.avg_ms_per_op()
        )?;
        write!(
            f,
            "  errors {}, latency ms: min {:.3} p50 {:.3} p90 {:.3} p99 {:.3} max {:.3}",
            self.errors,
            ms(self.latency.min),
            ms(self.latency.p50),
            ms(self.latency.p90),
            ms(self.latency.p99),
            ms(self.latency.max)
        )
    }
}
