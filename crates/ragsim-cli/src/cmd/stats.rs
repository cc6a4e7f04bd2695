//! Implementation of `ragsim stats <script>`.
//!
//! Executes a scenario script and prints the status-panel counters of the
//! original simulator: processes, resources, request edges, allocation
//! edges, plus totals. In `--format json` mode a single object is emitted.
//!
//! Exit codes: 0 = success, 2 = input/parse failure.
use crate::cli::{OutputFormat, PathOrStdin};
use crate::error::CliError;

/// Runs the `stats` command.
///
/// # Errors
///
/// Returns [`CliError`] with exit code 2 if the script cannot be read or
/// parsed.
pub fn run(source: &PathOrStdin, format: &OutputFormat) -> Result<(), CliError> {
    let session = super::load_session(source)?;
    let stats = session.stats();

    match format {
        OutputFormat::Human => {
            println!("processes:    {}", stats.processes);
            println!("resources:    {}", stats.resources);
            println!("requests:     {}", stats.requests);
            println!("allocations:  {}", stats.allocations);
            println!("nodes:        {}", session.graph().node_count());
            println!("edges:        {}", session.graph().edge_count());
        }
        OutputFormat::Json => match serde_json::to_string(&stats) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                return Err(CliError::IoError {
                    source: "stdout".to_owned(),
                    detail: e.to_string(),
                });
            }
        },
    }
    Ok(())
}
