//! kvlink CLI Client
//!
//! Sends one request to the server over a fresh connection and prints the
//! response.

use std::ffi::OsString;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use kvlink::config::{ClientConfig, DEFAULT_HOST, DEFAULT_PORT};
use kvlink::logging::{self, LogLevel};
use kvlink::protocol::{Request, Response, ResponseFormat, TagScheme};

/// kvlink CLI
#[derive(Parser, Debug)]
#[command(name = "kvlink-cli")]
#[command(about = "CLI for a binary key-value server")]
#[command(version, disable_help_flag = true)]
struct Args {
    /// Server host
    #[arg(short = 'h', long, default_value = DEFAULT_HOST)]
    host: String,

    /// Server port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Minimum log level
    #[arg(short = 'l', long = "level", value_enum, default_value_t = LogLevel::Info)]
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

    #[command(subcommand)]
    command: Operation,
}

/// Keys and values are taken as raw argument bytes and need not be UTF-8
#[derive(Subcommand, Debug)]
enum Operation {
    /// Set a key-value pair
    Set {
        /// The key to set
        #[arg(value_parser = clap::value_parser!(OsString))]
        key: OsString,

        /// The value to set
        #[arg(value_parser = clap::value_parser!(OsString))]
        value: OsString,
    },

    /// Get a value by key
    Get {
        /// The key to get
        #[arg(value_parser = clap::value_parser!(OsString))]
        key: OsString,
    },

    /// Delete a key
    Del {
        /// The key to delete
        #[arg(value_parser = clap::value_parser!(OsString))]
        key: OsString,
    },
}

impl Operation {
    fn to_request(&self) -> Request {
        match self {
            Operation::Set { key, value } => {
                Request::set(key.as_encoded_bytes(), value.as_encoded_bytes())
            }
            Operation::Get { key } => Request::get(key.as_encoded_bytes()),
            Operation::Del { key } => Request::del(key.as_encoded_bytes()),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing::subscriber::with_default(logging::subscriber(args.level), || match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    })
}

fn run(args: &Args) -> kvlink::Result<()> {
    let config = ClientConfig::builder()
        .host(&args.host)
        .port(args.port)
        .response_format(args.format)
        .tag_scheme(args.tags)
        .build();

    let response = kvlink::request_once(&config, &args.command.to_request())?;
    print_response(&response);
    Ok(())
}

fn print_response(response: &Response) {
    match &response.body {
        Some(body) => println!("Value: {}", String::from_utf8_lossy(body)),
        None => println!("Status: {}", response.status),
    }
}
