//! Job and executor script rendering.

use crate::types::SbatchHeader;
use camino::{Utf8Path, Utf8PathBuf};

pub const SHEBANG: &str = "#!/usr/bin/bash";

/// Shell variable holding the exit status of the main command.
pub const STATUS_VAR: &str = "cpac_status";

/// A bash script submitted with sbatch.
#[derive(Debug, Clone)]
pub struct JobScript {
    pub header: SbatchHeader,
    /// Directory the job changes into before running
    pub working_dir: Utf8PathBuf,
    /// Main command line, already shell-quoted
    pub command: String,
    /// Commands run before the main command
    pub before_run: Vec<String>,
    /// Commands run when the main command exits with status 0
    pub on_success: Vec<String>,
    /// Commands run when the main command fails
    pub on_failure: Vec<String>,
}

/// Render the job script.
///
/// Without success/failure hooks the main command is the last line, so the
/// job's exit status is the command's. With hooks the status is captured
/// and re-raised after they run.
pub fn render_job_script(job: &JobScript) -> String {
    let mut buf = vec![SHEBANG.to_string()];
    buf.extend(job.header.lines());
    buf.push(String::new());
    buf.push("set -x".to_string());
    buf.push(String::new());
    buf.push(format!("cd {} || exit", quote(job.working_dir.as_str())));
    buf.push(String::new());

    if !job.before_run.is_empty() {
        buf.extend(job.before_run.iter().cloned());
        buf.push(String::new());
    }

    buf.push(job.command.clone());

    if !job.on_success.is_empty() || !job.on_failure.is_empty() {
        buf.push(format!("{}=$?", STATUS_VAR));
        buf.push(String::new());
        buf.push(format!("if [ \"${}\" -eq 0 ]; then", STATUS_VAR));
        buf.extend(hook_lines(&job.on_success));
        buf.push("else".to_string());
        buf.extend(hook_lines(&job.on_failure));
        buf.push("fi".to_string());
        buf.push(format!("exit \"${}\"", STATUS_VAR));
    }

    buf.push(String::new());
    buf.join("\n")
}

fn hook_lines(hooks: &[String]) -> Vec<String> {
    if hooks.is_empty() {
        // bash rejects empty branches
        return vec!["    :".to_string()];
    }
    hooks.iter().map(|hook| format!("    {}", hook)).collect()
}

/// Render the executor script submitting every job script with sbatch.
pub fn render_executor<P: AsRef<Utf8Path>>(job_scripts: &[P]) -> String {
    let mut buf = vec![SHEBANG.to_string()];
    buf.extend(
        job_scripts
            .iter()
            .map(|path| format!("sbatch {}", quote(path.as_ref().as_str()))),
    );
    buf.push(String::new());
    buf.join("\n")
}

/// Quote a single word for bash, leaving plain words untouched.
///
/// Only NUL bytes make quoting fail; they can not appear in a path.
pub fn quote(word: &str) -> String {
    shlex::try_quote(word)
        .map(|quoted| quoted.into_owned())
        .unwrap_or_else(|_| word.replace('\0', ""))
}
