//! Clap CLI definition: root struct, subcommands, and shared argument types.
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// A CLI argument that is either a filesystem path or the stdin sentinel `"-"`.
///
/// Parsing `"-"` yields [`PathOrStdin::Stdin`]; anything else yields
/// [`PathOrStdin::Path`]. This avoids stringly-typed handling of the stdin
/// sentinel throughout the codebase.
#[derive(Clone, Debug)]
pub enum PathOrStdin {
    /// Read from standard input.
    Stdin,
    /// Read from the given filesystem path.
    Path(PathBuf),
}

impl std::str::FromStr for PathOrStdin {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(PathOrStdin::Stdin)
        } else {
            Ok(PathOrStdin::Path(PathBuf::from(s)))
        }
    }
}

/// Output format for CLI commands.
#[derive(Clone, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text output (default).
    Human,
    /// Structured JSON output.
    Json,
}

/// All top-level subcommands exposed by the `ragsim` binary.
#[derive(Subcommand)]
pub enum Command {
    /// Execute a scenario script and print the session log.
    Run {
        /// Path to a scenario script, or `-` for stdin.
        #[arg(value_name = "SCRIPT")]
        script: PathOrStdin,
    },

    /// Execute a scenario script, then run one deadlock detection over the
    /// final graph. Exits 1 if a deadlock is found, 0 if the system is safe.
    Check {
        /// Path to a scenario script, or `-` for stdin.
        #[arg(value_name = "SCRIPT")]
        script: PathOrStdin,
    },

    /// Execute a scenario script and print node/edge counters by kind.
    Stats {
        /// Path to a scenario script, or `-` for stdin.
        #[arg(value_name = "SCRIPT")]
        script: PathOrStdin,
    },
}

/// The `ragsim` command-line interface.
#[derive(Parser)]
#[command(
    name = "ragsim",
    version,
    about = "Resource-allocation graph deadlock simulator",
    long_about = "Models processes holding and requesting resources as a bipartite\n\
                  directed graph and detects deadlocks as cycles in it.\n\
                  Scenario scripts are line-oriented: process/resource/edge/\n\
                  remove-edge/detect/clear, with `#` comments."
)]
pub struct Cli {
    /// Active subcommand.
    #[command(subcommand)]
    pub command: Command,

    /// Output format: human (default) or json.
    #[arg(long, short = 'f', default_value = "human", global = true)]
    pub format: OutputFormat,
}
