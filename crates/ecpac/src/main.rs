//! ecpac - assemble and submit C-PAC jobs on SLURM.

use clap::Parser;
use ecpac_cli::report::{print_followup, print_plan, resource_warning};
use ecpac_cli::style::{self, label, label_emph};
use ecpac_cli::{
    confirm_location, render_ecpac_call, Args, PromptError, Prompter, Session, SessionError,
    Settings,
};
use ecpac_core::ValidationError;
use ecpac_runs::{PlanError, RunPlan, StoreError};
use ecpac_slack::Message;
use ecpac_slurm::{submit_executor, SubmitError};
use miette::{Diagnostic, IntoDiagnostic, Result};
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter.
const ENV_LOG: &str = "ECPAC_LOG";

#[derive(Error, Debug, Diagnostic)]
enum AppError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    #[diagnostic(help("Check the job scripts, then run the executor script again"))]
    Submit(#[from] SubmitError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Flags that steer the session after the request is collected.
struct Steps {
    yes: bool,
    launch: bool,
    print: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    // Prompts block the main thread; the worker is left to watch for Ctrl-C.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .into_diagnostic()?;
    runtime.spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancelled();
        }
    });

    match runtime.block_on(run(args)) {
        Err(AppError::Session(SessionError::Prompt(PromptError::Cancelled)))
        | Err(AppError::Prompt(PromptError::Cancelled)) => cancelled(),
        res => Ok(res?),
    }
}

fn cancelled() -> ! {
    eprintln!("\n{}", style::error("Cancelled."));
    std::process::exit(130);
}

/// Install a stderr subscriber; `ECPAC_LOG` or `RUST_LOG` override the level.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env(ENV_LOG)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

async fn run(args: Args) -> Result<(), AppError> {
    let settings = Settings::from_env(&args);
    let steps = Steps {
        yes: args.yes,
        launch: args.launch,
        print: args.print,
    };

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout(), !args.no_input);

    if !confirm_location(&mut prompter, &settings, steps.yes)? {
        return Ok(());
    }

    let request = Session::new(args, &settings, &mut prompter).collect()?;
    let call = render_ecpac_call(&request)?;
    tracing::debug!(%call, "reproducible call");

    let plan = RunPlan::build(&request, &call)?;

    if let Some(warning) = resource_warning(&plan.resources) {
        prompter.warn(warning)?;
    }

    if steps.print {
        if let Some(job) = plan.example_job() {
            prompter.say(&job.command)?;
        }
        return Ok(());
    }

    print_plan(prompter.output(), &plan)?;

    if let Some(job) = plan.example_job() {
        if prompter.confirm(&label(style::ICON_PREVIEW, "Preview example job?"), Some(false))? {
            prompter.say(&job.script)?;
        }
    }

    if !(steps.yes || prompter.confirm(&label_emph(style::ICON_SAVE, "Create files + folders?"), None)?)
    {
        return Ok(());
    }
    plan.apply()?;

    if !(steps.launch || prompter.confirm(&label_emph(style::ICON_LAUNCH, "Launch now?"), None)?) {
        prompter.say(format!(
            "Submit later with: bash {}",
            ecpac_slurm::quote(plan.executor.as_str())
        ))?;
        return Ok(());
    }

    launch(&plan, &mut prompter).await
}

/// Submit every job and record the SLURM job IDs in the run manifest.
async fn launch<R: BufRead, W: Write>(
    plan: &RunPlan,
    prompter: &mut Prompter<R, W>,
) -> Result<(), AppError> {
    let store = plan.store();
    let mut manifest = plan.manifest.clone();

    match submit_executor(&plan.executor, plan.jobs.len()).await {
        Ok(job_ids) => {
            manifest.mark_submitted(&job_ids);
            store.save(&manifest)?;
            if let Some(job) = plan.example_job() {
                print_followup(prompter.output(), &job.log_path)?;
            }
            Ok(())
        }
        Err(e) => {
            manifest.mark_failed();
            if let Err(store_err) = store.save(&manifest) {
                tracing::warn!("Failed to update run manifest: {}", store_err);
            }

            if let Some(webhook) = &plan.webhook {
                let message = Message::new("Failed to submit ecpac run")
                    .code("Run", &manifest.run_name)
                    .code("Executor", &plan.executor)
                    .field("Error", &e);
                if let Err(notify_err) = webhook.post(&message).await {
                    tracing::warn!("Failed to send Slack notification: {}", notify_err);
                }
            }

            Err(e.into())
        }
    }
}
