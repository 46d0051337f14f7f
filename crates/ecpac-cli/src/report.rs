//! Console summaries of a planned run.

use crate::style;
use camino::Utf8Path;
use crossterm::style::Stylize;
use ecpac_core::JobResources;
use ecpac_runs::RunPlan;
use std::io::{self, Write};

/// List every directory and file the plan will create.
pub fn print_plan<W: Write>(out: &mut W, plan: &RunPlan) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        style::heading(&format!(
            "{} The following directories and files will be created:",
            style::ICON_FOLDER
        ))
    )?;
    for entry in &plan.entries {
        let line = format!(" - {} {}", entry.label(), entry.path);
        if entry.is_file() {
            writeln!(out, "{}", line.green())?;
        } else {
            writeln!(out, "{}", line.blue())?;
        }
    }
    Ok(())
}

/// Warning shown when the job asks for extra threads to cover its memory.
pub fn resource_warning(resources: &JobResources) -> Option<String> {
    resources.memory_bound.then(|| {
        format!(
            "Job is memory-bound, increased job threads to {}. (C-PAC will get {}.)",
            resources.job_threads, resources.cpac_threads
        )
    })
}

/// Commands worth knowing once jobs are queued.
pub fn print_followup<W: Write>(out: &mut W, example_log: &Utf8Path) -> io::Result<()> {
    let tail = shlex::try_join(["tail", "-f", example_log.as_str()])
        .unwrap_or_else(|_| format!("tail -f {}", example_log));
    writeln!(out, "{}", style::heading("Jobs were submitted!"))?;
    writeln!(out, "{}", "Some commands you might find helpful:".blue())?;
    writeln!(out, "{}", "  Follow job output:".blue())?;
    writeln!(out, "{}", tail.blue())?;
    writeln!(out, "{}", "  List all running jobs:".blue())?;
    writeln!(out, "{}", "squeue --me".blue())?;
    Ok(())
}
