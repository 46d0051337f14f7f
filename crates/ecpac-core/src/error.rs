//! Validation errors for job requests.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Why a job request (or one of its fields) was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Run name must not be empty")]
    EmptyRunName,
    #[error("{label} directory does not exist: \"{path}\"")]
    MissingDir { label: String, path: Utf8PathBuf },
    #[error("{label} file does not exist: \"{path}\"")]
    MissingFile { label: String, path: Utf8PathBuf },
    #[error("No subjects selected")]
    EmptySubjects,
    #[error("Some subject directories do not exist in input dir \"{input}\": {}", quoted(.missing))]
    MissingSubjects {
        input: Utf8PathBuf,
        missing: Vec<String>,
    },
    #[error("No pipelines selected")]
    EmptyPipelines,
    #[error("Unknown preset \"{0}\" (not a preconfig and no such pipeline file)")]
    UnknownPreset(String),
    #[error("Can not mix preconfigs ({}) and pipeline config files ({})", .presets.join(", "), .files.join(", "))]
    MixedPipelines {
        presets: Vec<String>,
        files: Vec<String>,
    },
    #[error("Analysis level invalid ({0}), must be one of: participant, group, test_config")]
    InvalidAnalysisLevel(String),
    #[error("Not a valid C-PAC source directory: \"{0}\"")]
    InvalidCpacDir(Utf8PathBuf),
    #[error("Invalid {field}: \"{value}\"")]
    InvalidNumber { field: String, value: String },
    #[error("Argument can not be quoted for the shell: {0}")]
    Unquotable(String),
}

fn quoted(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("\"{}\"", item))
        .collect::<Vec<_>>()
        .join(" ")
}
