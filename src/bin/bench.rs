//! kvlink Benchmark
//!
//! Measures Set/Get/Del throughput and latency against a running server.

use std::process::ExitCode;

use clap::{ArgAction, Parser};
use kvlink::bench::BenchDriver;
use kvlink::config::{BenchConfig, ClientConfig, ConnectionMode, DEFAULT_PORT};
use kvlink::logging::{self, LogLevel};
use kvlink::protocol::{Command, ResponseFormat, TagScheme};

/// kvlink Benchmark
#[derive(Parser, Debug)]
#[command(name = "kvlink-bench")]
#[command(about = "Load generator for a binary key-value server")]
#[command(version, disable_help_flag = true)]
struct Args {
    /// Server host
    #[arg(short = 'h', long)]
    host: String,

    /// Server port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Timed operations per command
    #[arg(short = 'n', long, default_value = "1000")]
    ops: usize,

    /// Untimed warm-up operations per command
    #[arg(long, default_value = "10")]
    warmup: usize,

    /// Concurrent workers
    #[arg(short, long, default_value = "1")]
    workers: usize,

    /// Keep one connection per worker instead of one per operation
    #[arg(long)]
    persistent: bool,

    /// Minimum log level
    #[arg(short = 'l', long = "level", value_enum, default_value_t = LogLevel::Warn)]
    level: LogLevel,

    /// Response frame format spoken by the server
    #[arg(short, long, value_enum, default_value_t = ResponseFormat::StatusCoded)]
    format: ResponseFormat,

    /// Command tag mapping expected by the server
    #[arg(short, long, value_enum, default_value_t = TagScheme::Canonical)]
    tags: TagScheme,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing::subscriber::with_default(logging::subscriber(args.level), || match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Benchmark failed: {}", e);
            ExitCode::FAILURE
        }
    })
}

fn run(args: &Args) -> kvlink::Result<()> {
    let client = ClientConfig::builder()
        .host(&args.host)
        .port(args.port)
        .response_format(args.format)
        .tag_scheme(args.tags)
        .build();

    let mode = if args.persistent {
        ConnectionMode::Persistent
    } else {
        ConnectionMode::Ephemeral
    };

    let config = BenchConfig::builder()
        .client(client)
        .ops(args.ops)
        .warmup_ops(args.warmup)
        .workers(args.workers)
        .mode(mode)
        .build();

    let driver = BenchDriver::new(config)?;

    println!(
        "Benchmarking against {}:{} with {} ops per command ({} workers, {:?} connections)",
        args.host, args.port, args.ops, args.workers, mode
    );
    for command in Command::ALL {
        let report = driver.run_phase(command)?;
        println!("{report}");
    }

    Ok(())
}
