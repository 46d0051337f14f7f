//! Plan every directory and script of a run.

use crate::fsplan::FsPlan;
use crate::store::{ManifestStore, StoreError};
use crate::types::{JobRecord, RunManifest};
use camino::{Utf8Path, Utf8PathBuf};
use ecpac_core::{absolute, CpacInvocation, JobRequest, JobResources, ValidationError};
use ecpac_parsers::format_gb;
use ecpac_slack::{Message, NotifyError, SlackWebhook};
use ecpac_slurm::{render_executor, render_job_script, JobScript, SbatchHeader, SHEBANG};
use thiserror::Error;

pub const JOB_SCRIPT_FILE: &str = "run_job.sh";
pub const JOB_LOG_FILE: &str = "out.log";
pub const OUTPUT_DIR: &str = "output";
pub const WORKING_DIR: &str = "wd";
pub const EXECUTOR_FILE: &str = "run.sh";
pub const CALL_FILE: &str = "ecpac_call.sh";

#[derive(Error, Debug)]
pub enum PlanError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Notify(#[from] NotifyError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One job of the plan.
#[derive(Debug, Clone)]
pub struct PlannedJob {
    pub pipeline_id: String,
    pub subject: String,
    pub script_path: Utf8PathBuf,
    pub log_path: Utf8PathBuf,
    /// Full sbatch script
    pub script: String,
    /// C-PAC command line inside the script
    pub command: String,
}

/// All files and directories of a run, sorted by path.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub run_dir: Utf8PathBuf,
    pub executor: Utf8PathBuf,
    pub entries: Vec<FsPlan>,
    pub jobs: Vec<PlannedJob>,
    pub resources: JobResources,
    pub manifest: RunManifest,
    /// Slack webhook from the request, used by the job scripts
    pub webhook: Option<SlackWebhook>,
}

/// Absolute forms of the request's paths, so scripts work from any directory.
struct Paths {
    input: Utf8PathBuf,
    image: Utf8PathBuf,
    run_dir: Utf8PathBuf,
    cpac_sources: Option<Utf8PathBuf>,
}

impl RunPlan {
    /// Validate the request and plan one job per (pipeline, subject) pair.
    ///
    /// Job scripts post Slack notifications when the request carries a
    /// webhook URL.
    pub fn build(request: &JobRequest, ecpac_call: &str) -> Result<Self, PlanError> {
        request.validate()?;
        let webhook = SlackWebhook::new(request.webhook_url.as_deref());

        let paths = Paths {
            input: absolute(&request.input_dir)?,
            image: absolute(&request.image)?,
            run_dir: absolute(&request.run_dir())?,
            cpac_sources: request
                .cpac_sources
                .as_deref()
                .map(absolute)
                .transpose()?,
        };
        let resources = request.resources.split();

        let mut entries = Vec::new();
        let mut jobs = Vec::new();
        let mut records = Vec::new();

        for (index, pipeline, subject) in request.pairs() {
            let pipeline_id = pipeline.id(index);
            let job_dir = paths.run_dir.join(&pipeline_id).join(subject);
            let output_dir = job_dir.join(OUTPUT_DIR);
            let working_dir = job_dir.join(WORKING_DIR);
            let script_path = job_dir.join(JOB_SCRIPT_FILE);
            let log_path = job_dir.join(JOB_LOG_FILE);

            let invocation = CpacInvocation {
                image: paths.image.clone(),
                input_dir: paths.input.clone(),
                output_dir: output_dir.clone(),
                analysis_level: request.analysis_level,
                threads: resources.cpac_threads,
                memory_gb: resources.cpac_memory_gb,
                subject: subject.to_string(),
                pipeline: pipeline.clone(),
                cpac_sources: paths.cpac_sources.clone(),
                save_working_dir: request.save_working_dir.then(|| working_dir.clone()),
                extra_args: request.extra_cpac_args.clone(),
            };
            let command = invocation.render()?;

            let mut job = JobScript {
                header: SbatchHeader::shared(
                    format!("{}_{}_{}", request.run_name, pipeline_id, subject),
                    log_path.clone(),
                    request.resources.duration,
                    resources.job_threads,
                    resources.job_memory_gb,
                ),
                working_dir: job_dir.clone(),
                command: command.clone(),
                before_run: Vec::new(),
                on_success: Vec::new(),
                on_failure: Vec::new(),
            };

            if let Some(webhook) = &webhook {
                let notes = Notes {
                    request,
                    paths: &paths,
                    pipeline_id: &pipeline_id,
                    subject,
                    job_dir: &job_dir,
                };
                job.before_run
                    .push(webhook.bash_command(&notes.starting())?);
                job.on_success
                    .push(webhook.bash_command(&notes.finished("Finished ecpac run"))?);
                job.on_failure
                    .push(webhook.bash_command(&notes.finished("Failed ecpac run"))?);
            }

            let script = render_job_script(&job);

            entries.push(FsPlan::executable(script_path.clone(), script.clone()));
            entries.push(FsPlan::dir(output_dir));
            if request.save_working_dir {
                entries.push(FsPlan::dir(working_dir));
            }

            records.push(JobRecord {
                pipeline_id: pipeline_id.clone(),
                pipeline: pipeline.cpac_value().to_string(),
                subject: subject.to_string(),
                script: script_path.clone(),
                log: log_path.clone(),
                slurm_job_id: None,
            });

            jobs.push(PlannedJob {
                pipeline_id,
                subject: subject.to_string(),
                script_path,
                log_path,
                script,
                command,
            });
        }

        let executor = paths.run_dir.join(EXECUTOR_FILE);
        let script_paths: Vec<&Utf8Path> = jobs.iter().map(|j| j.script_path.as_path()).collect();
        entries.push(FsPlan::executable(
            executor.clone(),
            render_executor(&script_paths),
        ));

        entries.push(FsPlan::executable(
            paths.run_dir.join(CALL_FILE),
            format!("{}\n{}\n", SHEBANG, ecpac_call),
        ));

        let manifest = RunManifest::new(request.run_name.clone(), ecpac_call.to_string(), records);
        entries.push(FsPlan::file(
            ManifestStore::new(&paths.run_dir).path().to_path_buf(),
            ManifestStore::to_json(&manifest)?,
        ));

        entries.sort_by(|a, b| a.path.cmp(&b.path));
        tracing::debug!(jobs = jobs.len(), entries = entries.len(), "planned run");

        Ok(Self {
            run_dir: paths.run_dir,
            executor,
            entries,
            jobs,
            resources,
            manifest,
            webhook,
        })
    }

    /// Write every planned entry to disk.
    pub fn apply(&self) -> Result<(), PlanError> {
        for entry in &self.entries {
            entry.apply()?;
        }
        tracing::info!(run_dir = %self.run_dir, "created run files");
        Ok(())
    }

    /// First job, used for previews.
    pub fn example_job(&self) -> Option<&PlannedJob> {
        self.jobs.first()
    }

    pub fn store(&self) -> ManifestStore {
        ManifestStore::new(&self.run_dir)
    }
}

/// Slack messages for one job.
struct Notes<'a> {
    request: &'a JobRequest,
    paths: &'a Paths,
    pipeline_id: &'a str,
    subject: &'a str,
    job_dir: &'a Utf8Path,
}

impl Notes<'_> {
    fn starting(&self) -> Message {
        Message::new("Starting ecpac run")
            .code("Run", &self.request.run_name)
            .code("Pipeline", self.pipeline_id)
            .code("Subject", self.subject)
            .code("Input", &self.paths.input)
            .code("Output", self.job_dir)
            .code("Image", &self.paths.image)
            .field("Threads", self.request.resources.threads)
            .field(
                "Memory",
                format!("{} GB", format_gb(self.request.resources.memory_gb)),
            )
            .code("Analysis level", self.request.analysis_level)
    }

    fn finished(&self, title: &str) -> Message {
        Message::new(title)
            .code("Run", &self.request.run_name)
            .code("Pipeline", self.pipeline_id)
            .code("Subject", self.subject)
            .code("Analysis level", self.request.analysis_level)
            .code("Output", self.job_dir)
    }
}
