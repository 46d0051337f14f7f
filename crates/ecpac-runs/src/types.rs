use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum RunStatus {
    /// Files written, nothing submitted yet
    #[default]
    Planned,
    Submitted,
    SubmitFailed,
}

/// A single job of a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobRecord {
    /// Directory name of the pipeline within the run.
    pub pipeline_id: String,

    /// Preconfig name or pipeline file path.
    pub pipeline: String,

    pub subject: String,

    /// Absolute path of the sbatch script.
    pub script: Utf8PathBuf,

    /// Absolute path of the job's stdout log.
    pub log: Utf8PathBuf,

    /// SLURM job ID once submitted.
    pub slurm_job_id: Option<String>,
}

/// Record of a run, stored next to its job scripts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub run_name: String,

    /// When the run was planned.
    pub created: DateTime<Utc>,

    /// When the run was last updated (submission).
    pub last_updated: DateTime<Utc>,

    pub status: RunStatus,

    /// Command line reproducing this run.
    pub ecpac_call: String,

    pub jobs: Vec<JobRecord>,
}

impl RunManifest {
    pub fn new(run_name: String, ecpac_call: String, jobs: Vec<JobRecord>) -> Self {
        let now = Utc::now();
        Self {
            run_name,
            created: now,
            last_updated: now,
            status: RunStatus::Planned,
            ecpac_call,
            jobs,
        }
    }

    /// Attach SLURM job IDs, in job order, and mark the run submitted.
    pub fn mark_submitted(&mut self, job_ids: &[String]) {
        for (job, id) in self.jobs.iter_mut().zip(job_ids) {
            job.slurm_job_id = Some(id.clone());
        }
        self.status = RunStatus::Submitted;
        self.last_updated = Utc::now();
    }

    pub fn mark_failed(&mut self) {
        self.status = RunStatus::SubmitFailed;
        self.last_updated = Utc::now();
    }
}
