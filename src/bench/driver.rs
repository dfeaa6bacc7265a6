//! Benchmark driver
//!
//! Runs the Set, Get and Del phases against a live server. Each phase warms
//! up on a single connection, then spreads the timed operations over a pool
//! of worker threads fed from a bounded channel.

use std::time::Instant;

use crossbeam::channel;

use super::stats::{LatencyRecorder, PhaseReport};
use crate::config::{BenchConfig, ClientConfig, ConnectionMode};
use crate::error::{KvError, Result};
use crate::network::{request_once, Connection};
use crate::protocol::{Command, Request, Response};

/// Request for operation `i` of a phase: key `key{i}`, value `value{i}`
pub fn request_for(command: Command, i: usize) -> Request {
    let key = format!("key{i}");
    match command {
        Command::Set => Request::set(key, format!("value{i}")),
        Command::Get => Request::get(key),
        Command::Del => Request::del(key),
    }
}

/// Largest worker pool a driver will start
pub const MAX_WORKERS: usize = 1024;

/// Drives benchmark phases
pub struct BenchDriver {
    config: BenchConfig,
}

impl BenchDriver {
    pub fn new(config: BenchConfig) -> Result<Self> {
        if config.workers == 0 {
            return Err(KvError::Config("at least one worker is required".to_string()));
        }
        if config.workers > MAX_WORKERS {
            return Err(KvError::Config(format!(
                "{} workers requested, at most {} allowed",
                config.workers, MAX_WORKERS
            )));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Run every phase in order: Set, Get, Del
    pub fn run(&self) -> Result<Vec<PhaseReport>> {
        Command::ALL
            .into_iter()
            .map(|command| self.run_phase(command))
            .collect()
    }

    /// Warm up, then time `ops` operations of `command`
    pub fn run_phase(&self, command: Command) -> Result<PhaseReport> {
        self.warm_up(command);

        let ops = self.config.ops;
        let workers = self.config.workers;
        let recorder = LatencyRecorder::new();
        let dispatch = tracing::dispatcher::get_default(|d| d.clone());

        tracing::debug!("Phase {}: {} ops on {} workers", command, ops, workers);

        let start = Instant::now();
        crossbeam::scope(|s| {
            let (tx, rx) = channel::bounded::<usize>(workers.saturating_mul(4));
            let recorder = &recorder;

            for _ in 0..workers {
                let rx = rx.clone();
                let dispatch = dispatch.clone();
                let client = &self.config.client;
                let mode = self.config.mode;

                s.spawn(move |_| {
                    tracing::dispatcher::with_default(&dispatch, || {
                        let mut worker = Worker::new(client, mode);
                        let mut latencies = Vec::new();
                        let mut errors = 0;

                        for i in rx.iter() {
                            let request = request_for(command, i);
                            let begin = Instant::now();
                            match worker.perform(&request) {
                                Ok(_) => latencies.push(begin.elapsed()),
                                Err(e) => {
                                    errors += 1;
                                    tracing::warn!("{} key{} failed: {}", command, i, e);
                                }
                            }
                        }

                        worker.finish();
                        recorder.record_batch(latencies, errors);
                    })
                });
            }
            drop(rx);

            for i in 0..ops {
                if tx.send(i).is_err() {
                    break;
                }
            }
        })
        .map_err(|_| KvError::WorkerPanic)?;
        let elapsed = start.elapsed();

        Ok(recorder.report(command, ops, elapsed))
    }

    /// Untimed sequential operations; failures are logged and ignored
    fn warm_up(&self, command: Command) {
        let mut worker = Worker::new(&self.config.client, self.config.mode);
        for i in 0..self.config.warmup_ops {
            if let Err(e) = worker.perform(&request_for(command, i)) {
                tracing::debug!("Warm-up {} key{} failed: {}", command, i, e);
            }
        }
        worker.finish();
    }
}

/// Executes operations for one thread, owning its connection
struct Worker<'a> {
    client: &'a ClientConfig,
    mode: ConnectionMode,
    connection: Option<Connection>,
}

impl<'a> Worker<'a> {
    fn new(client: &'a ClientConfig, mode: ConnectionMode) -> Self {
        Self {
            client,
            mode,
            connection: None,
        }
    }

    fn perform(&mut self, request: &Request) -> Result<Response> {
        match self.mode {
            ConnectionMode::Ephemeral => request_once(self.client, request),
            ConnectionMode::Persistent => {
                // A failed connection is never reused; open a new one
                let connection = match self.connection.take() {
                    Some(conn) if conn.is_usable() => conn,
                    _ => Connection::connect(self.client)?,
                };
                let connection = self.connection.insert(connection);
                connection.execute(request)
            }
        }
    }

    fn finish(&mut self) {
        if let Some(connection) = self.connection.take() {
            if let Err(e) = connection.close() {
                tracing::debug!("Closing worker connection failed: {}", e);
            }
        }
    }
}

