//! CLI error types with associated exit codes.
//!
//! [`CliError`] is the top-level error type for the `ragsim` binary. Every
//! variant maps to a stable exit code (1 or 2) via [`CliError::exit_code`]:
//!
//! - Exit code **2** — input failure: the tool could not read or parse the
//!   scenario script at all. These errors terminate early before any domain
//!   logic runs.
//! - Exit code **1** — logical failure: the tool ran to completion and the
//!   `check` subcommand found a deadlock.

use std::fmt;
use std::path::PathBuf;

/// All error conditions that the `ragsim` CLI can produce.
///
/// Use [`CliError::exit_code`] to obtain the exit code associated with each
/// variant. [`CliError::message`] returns the human-readable error string
/// that should be printed to stderr before exiting (empty when the relevant
/// output has already been printed).
#[derive(Debug)]
pub enum CliError {
    // --- Exit code 2: input failures ---
    /// A script argument could not be found on the filesystem.
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The process lacks permission to read a file.
    PermissionDenied {
        /// The path that could not be read.
        path: PathBuf,
    },

    /// The input bytes are not valid UTF-8.
    InvalidUtf8 {
        /// A human-readable label for the source (`"-"` for stdin, or the
        /// filesystem path).
        source: String,
        /// The byte offset of the first invalid byte sequence.
        byte_offset: usize,
    },

    /// An I/O error occurred while reading from stdin.
    StdinReadError {
        /// The underlying I/O error message.
        detail: String,
    },

    /// A generic I/O error not covered by the more specific variants above.
    IoError {
        /// A human-readable label for the source.
        source: String,
        /// The underlying I/O error message.
        detail: String,
    },

    /// The scenario script failed to parse.
    ScriptParse {
        /// 1-based line number of the offending line.
        line: usize,
        /// A description of what was wrong with the line.
        detail: String,
    },

    // --- Exit code 1: logical failures ---
    /// The `check` subcommand found a deadlock.
    ///
    /// The report has already been printed; this variant exists so `main`
    /// can call `process::exit(1)` cleanly.
    DeadlockDetected,
}

impl CliError {
    /// Returns the process exit code for this error.
    ///
    /// - `2` — input failure (file not found, script parse error, etc.).
    /// - `1` — logical failure (deadlock found by `check`).
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::InvalidUtf8 { .. }
            | Self::StdinReadError { .. }
            | Self::IoError { .. }
            | Self::ScriptParse { .. } => 2,

            Self::DeadlockDetected => 1,
        }
    }

    /// Returns a human-readable error message suitable for printing to
    /// stderr, or an empty string when the relevant output has already been
    /// printed by the subcommand.
    pub fn message(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("error: file not found: {}", path.display())
            }
            Self::PermissionDenied { path } => {
                format!("error: permission denied: {}", path.display())
            }
            Self::InvalidUtf8 {
                source,
                byte_offset,
            } => {
                format!("error: {source} is not valid UTF-8 (first invalid byte at offset {byte_offset})")
            }
            Self::StdinReadError { detail } => {
                format!("error: failed to read stdin: {detail}")
            }
            Self::IoError { source, detail } => {
                format!("error: failed to read {source}: {detail}")
            }
            Self::ScriptParse { line, detail } => {
                format!("error: script line {line}: {detail}")
            }
            Self::DeadlockDetected => String::new(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for CliError {}
