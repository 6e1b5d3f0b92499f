//! CLI module for typeforge
//!
//! ## Commands
//!
//! - `synth --type <TYPE>` - Synthesize a type and exercise its property
//! - `types` - List the builtin type vocabulary
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
use std::process;

use clap::{Parser, Subcommand};

use crate::version::TYPEFORGE_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
    /// The command line itself was unusable (bad type expression, bad JSON).
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

    /// Create a usage error (exit code 2).
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

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Synthesize single-property types at runtime
#[derive(Parser, Debug)]
#[command(name = "typeforge")]
#[command(version = TYPEFORGE_VERSION)]
#[command(about = "Synthesize single-property fixture types at runtime", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Synthesize a type, instantiate it and exercise its property
    Synth(SynthArgs),

    /// List the builtin type names and their aliases
    Types,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SynthArgs {
    /// Property name
    #[arg(short, long, default_value = "Bar")]
    pub property: String,

    /// Property type expression (e.g. `string`, `int32?`, `date-time[]`)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub ty: String,

    /// JSON value to store through the setter and read back
    #[arg(long, value_name = "JSON")]
    pub set: Option<String>,

    /// Print the disassembled type
    #[arg(long)]
    pub disasm: bool,

    /// Leading segment of the container name
    #[arg(long, value_name = "PREFIX")]
    pub container_prefix: Option<String>,

    /// Base name of the generated type
    #[arg(long, value_name = "NAME")]
    pub type_name: Option<String>,
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

    match execute(cli) {
        Ok(output) => print!("{}", output),
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return its output.
fn execute(cli: Cli) -> CliResult<String> {
    match cli.command {
        Command::Synth(args) => commands::synth(&args),
        Command::Types => Ok(commands::types()),
    }
}
