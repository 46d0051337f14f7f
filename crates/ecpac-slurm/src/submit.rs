//! Submit job scripts with sbatch.

use camino::Utf8Path;
use ecpac_parsers::{run_command, CommandError};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tokio::process::Command;

static SUBMITTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Submitted batch job (\d+)").expect("valid regex"));

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Submission failed: {0}")]
    Command(#[from] CommandError),
    #[error("Only {submitted} of {expected} jobs were accepted by sbatch")]
    Incomplete { submitted: usize, expected: usize },
}

/// Job IDs reported by sbatch, in submission order.
pub fn parse_submitted_job_ids(stdout: &str) -> Vec<String> {
    SUBMITTED
        .captures_iter(stdout)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Run the executor script and collect the submitted job IDs.
///
/// Every job must be accepted; anything less is reported as
/// [`SubmitError::Incomplete`].
pub async fn submit_executor(
    executor: &Utf8Path,
    expected: usize,
) -> Result<Vec<String>, SubmitError> {
    let mut cmd = Command::new("bash");
    cmd.arg(executor.as_str());

    let stdout = run_command(&mut cmd, "sbatch").await?;
    let job_ids = parse_submitted_job_ids(&stdout);
    tracing::info!(jobs = job_ids.len(), "sbatch accepted jobs");

    if job_ids.len() < expected {
        return Err(SubmitError::Incomplete {
            submitted: job_ids.len(),
            expected,
        });
    }

    Ok(job_ids)
}
