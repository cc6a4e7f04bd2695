//! Command modules for the `ragsim` CLI.
//!
//! Each submodule implements one subcommand. The `run` function in each
//! module takes the parsed arguments and returns `Ok(())` on success or
//! a [`crate::error::CliError`] on failure.

pub mod check;
pub mod run;
pub mod stats;

use crate::cli::PathOrStdin;
use crate::error::CliError;
use crate::io::read_input;
use crate::script::parse_script;
use crate::session::Session;

/// Reads and parses a scenario script, then plays it through a fresh session.
///
/// Shared front half of every subcommand.
fn load_session(source: &PathOrStdin) -> Result<Session, CliError> {
    let content = read_input(source)?;
    let commands = parse_script(&content).map_err(|e| CliError::ScriptParse {
        line: e.line,
        detail: e.detail,
    })?;
    let mut session = Session::new();
    session.apply_all(&commands);
    Ok(session)
}
