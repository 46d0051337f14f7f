//! SLURM integration for ecpac.
//!
//! Render sbatch job scripts and submit them.

pub mod script;
pub mod submit;
pub mod types;

pub use script::{quote, render_executor, render_job_script, JobScript, SHEBANG, STATUS_VAR};
pub use submit::{parse_submitted_job_ids, submit_executor, SubmitError};
pub use types::SbatchHeader;
