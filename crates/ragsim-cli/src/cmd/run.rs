//! Implementation of `ragsim run <script>`.
//!
//! Executes a scenario script and prints the session log to stdout — the
//! terminal equivalent of the original simulator's log panel. In
//! `--format json` mode a single object is emitted with the log lines and
//! the report of the last `detect` command (or `null` if the script never
//! detected).
//!
//! Exit codes: 0 = success, 2 = input/parse failure.
use crate::cli::{OutputFormat, PathOrStdin};
use crate::error::CliError;

/// Runs the `run` command.
///
/// # Errors
///
/// Returns [`CliError`] with exit code 2 if the script cannot be read or
/// parsed.
pub fn run(source: &PathOrStdin, format: &OutputFormat) -> Result<(), CliError> {
    let session = super::load_session(source)?;

    match format {
        OutputFormat::Human => {
            for line in session.log() {
                println!("{line}");
            }
        }
        OutputFormat::Json => {
            let payload = serde_json::json!({
                "log": session.log(),
                "report": session.last_report(),
            });
            println!("{payload}");
        }
    }
    Ok(())
}
