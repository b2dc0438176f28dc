//! CLI module for the sockidl compiler
//!
//! ## Commands
//!
//! - `lex <file>` - Print the token stream
//! - `parse <file>` - Print the syntax tree
//! - `check <file>` - Run every frontend check
//! - `plan <file> [--json]` - Show message ids and schemas
//! - `generate <file> -o <dir>` - Write one Rust file per interface
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use sockidl_core::protocol::DEFAULT_MESSAGE_ID_BASE;

use crate::backend::config::CodegenConfig;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    /// The input has errors.
    pub const FAILURE: ExitCode = ExitCode(1);
    /// Bad invocation or I/O failure.
    pub const USAGE: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Create a usage/I/O error (exit code 2).
    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::USAGE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// IDL compiler for socket RPC and notification code
#[derive(Parser, Debug)]
#[command(name = "sockidl")]
#[command(version = VERSION)]
#[command(about = "Generate Rust socket RPC and notification code from IDL", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Tokenize only (debug)
    Lex {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Parse only (debug)
    Parse {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Run every check without generating code
    Check {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Show the message ids and schemas each interface gets
    Plan {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Print the JSON protocol descriptor instead of a listing
        #[arg(long)]
        json: bool,
        /// First message id of every interface
        #[arg(long = "id-base", value_name = "N", default_value_t = DEFAULT_MESSAGE_ID_BASE)]
        id_base: u32,
    },

    /// Generate Rust code, one file per interface
    Generate {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Output directory
        #[arg(short = 'o', long = "out-dir", value_name = "DIR", default_value = "generated")]
        out_dir: PathBuf,
        /// Also write protocol.json
        #[arg(long)]
        descriptor: bool,
        /// First message id of every interface
        #[arg(long = "id-base", value_name = "N", default_value_t = DEFAULT_MESSAGE_ID_BASE)]
        id_base: u32,
        /// Path generated code uses for the runtime crate
        #[arg(long = "runtime-crate", value_name = "PATH")]
        runtime_crate: Option<String>,
        /// Omit the "Generated by" header
        #[arg(long = "no-header")]
        no_header: bool,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Install the stderr subscriber: `RUST_LOG` wins, then `--verbose`, then `info`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .try_init();
}

/// Execute the CLI command and return result.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Lex { file } => commands::lex_file(&file),
        Command::Parse { file } => commands::parse_file(&file),
        Command::Check { file } => commands::check_file(&file),
        Command::Plan { file, json, id_base } => {
            let config = CodegenConfig::new().with_message_id_base(id_base);
            commands::plan_file(&file, &config, json)
        }
        Command::Generate {
            file,
            out_dir,
            descriptor,
            id_base,
            runtime_crate,
            no_header,
        } => {
            let mut config = CodegenConfig::new()
                .with_message_id_base(id_base)
                .with_header(!no_header);
            if let Some(path) = runtime_crate {
                config = config.with_runtime_crate(path);
            }
            commands::generate_files(&file, &out_dir, &config, descriptor)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
