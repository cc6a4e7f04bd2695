//! Implementation of `ragsim check <script>`.
//!
//! Executes a scenario script, then runs one deadlock detection over the
//! final graph (regardless of any `detect` commands inside the script) and
//! prints the result. The exit code makes the verdict scriptable:
//!
//! - 0 — the system is deadlock-free
//! - 1 — a deadlock was found (report printed to stdout)
//! - 2 — the script could not be read or parsed
use ragsim_core::detect_deadlock;

use crate::cli::{OutputFormat, PathOrStdin};
use crate::error::CliError;

/// Runs the `check` command.
///
/// # Errors
///
/// - [`CliError::DeadlockDetected`] (exit 1) after printing the report.
/// - Input/parse failures with exit code 2.
pub fn run(source: &PathOrStdin, format: &OutputFormat) -> Result<(), CliError> {
    let session = super::load_session(source)?;
    let report = detect_deadlock(session.graph());

    match format {
        OutputFormat::Human => {
            if report.deadlocked {
                let cycle = report
                    .cycle
                    .iter()
                    .map(|id| id.as_ref())
                    .collect::<Vec<&str>>()
                    .join(" -> ");
                println!("deadlock detected");
                println!("cycle: {cycle}");
            } else {
                println!("no deadlock detected");
            }
        }
        OutputFormat::Json => match serde_json::to_string(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                return Err(CliError::IoError {
                    source: "stdout".to_owned(),
                    detail: e.to_string(),
                });
            }
        },
    }

    if report.deadlocked {
        Err(CliError::DeadlockDetected)
    } else {
        Ok(())
    }
}
