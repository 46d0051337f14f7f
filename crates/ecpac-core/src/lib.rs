//! Core data model for ecpac.
//!
//! A [`JobRequest`] gathers everything needed to run C-PAC for a set of
//! subjects and pipelines. It is validated once, then rendered into one
//! [`CpacInvocation`] per (pipeline, subject) pair.

pub mod analysis;
pub mod cpac;
pub mod error;
pub mod pipeline;
pub mod preset;
pub mod request;
pub mod resources;

pub use analysis::AnalysisLevel;
pub use cpac::{CpacInvocation, ParsedInvocation};
pub use error::ValidationError;
pub use pipeline::{Pipeline, PipelineSelection};
pub use preset::Preset;
pub use request::{
    absolute, check_cpac_dir, check_creatable, check_dir, check_file, check_subjects,
    cpac_dir_valid, dedup_subjects, discover_subjects, missing_subjects, JobRequest,
};
pub use resources::{JobResources, Resources};
