//! The job request assembled by a session.

use crate::analysis::AnalysisLevel;
use crate::error::ValidationError;
use crate::pipeline::{Pipeline, PipelineSelection};
use crate::resources::Resources;
use camino::{Utf8Path, Utf8PathBuf};
use std::io;

/// Everything needed to plan one ecpac run.
#[derive(Debug, Clone)]
pub struct JobRequest {
    /// Run name, used as the run directory under the output directory
    pub run_name: String,
    /// Subject identifiers, in order and without duplicates
    pub subjects: Vec<String>,
    pub pipelines: PipelineSelection,
    pub analysis_level: AnalysisLevel,
    /// BIDS input directory containing one folder per subject
    pub input_dir: Utf8PathBuf,
    /// Directory holding all runs
    pub output_dir: Utf8PathBuf,
    /// Singularity image (.sif)
    pub image: Utf8PathBuf,
    /// C-PAC source checkout to patch into the image
    pub cpac_sources: Option<Utf8PathBuf>,
    pub resources: Resources,
    /// Keep the C-PAC working directory next to the outputs
    pub save_working_dir: bool,
    /// Passed verbatim to C-PAC
    pub extra_cpac_args: String,
    /// Slack incoming webhook for job notifications
    pub webhook_url: Option<String>,
}

impl JobRequest {
    /// Check every invariant of the request against the filesystem.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.run_name.trim().is_empty() {
            return Err(ValidationError::EmptyRunName);
        }
        if self.resources.threads == 0 {
            return Err(ValidationError::InvalidNumber {
                field: "threads".to_string(),
                value: "0".to_string(),
            });
        }
        if !(self.resources.memory_gb.is_finite() && self.resources.memory_gb > 0.0) {
            return Err(ValidationError::InvalidNumber {
                field: "memory".to_string(),
                value: self.resources.memory_gb.to_string(),
            });
        }

        check_file(&self.image, "Singularity image")?;
        if let Some(sources) = &self.cpac_sources {
            check_cpac_dir(sources)?;
        }
        check_dir(&self.input_dir, "Input")?;
        check_subjects(&self.input_dir, &self.subjects)?;
        check_creatable(&self.output_dir, "Output")?;

        for pipeline in self.pipelines.pipelines() {
            if let Pipeline::ConfigFile(path) = pipeline {
                check_file(path, "Pipeline config")?;
            }
        }

        Ok(())
    }

    /// Every (pipeline index, pipeline, subject) combination, pipeline-major.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, &Pipeline, &str)> + '_ {
        self.pipelines
            .pipelines()
            .iter()
            .enumerate()
            .flat_map(move |(index, pipeline)| {
                self.subjects
                    .iter()
                    .map(move |subject| (index, pipeline, subject.as_str()))
            })
    }

    /// Directory of this run.
    pub fn run_dir(&self) -> Utf8PathBuf {
        self.output_dir.join(&self.run_name)
    }
}

/// Remove duplicates while keeping the first occurrence of each subject.
pub fn dedup_subjects<I, S>(subjects: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = Vec::new();
    for subject in subjects {
        let subject = subject.into();
        if !seen.contains(&subject) {
            seen.push(subject);
        }
    }
    seen
}

/// Subject folders found in the input directory, sorted by name.
pub fn discover_subjects(input_dir: &Utf8Path) -> io::Result<Vec<String>> {
    let mut subjects = Vec::new();
    for entry in input_dir.read_dir_utf8()? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            subjects.push(entry.file_name().to_string());
        }
    }
    subjects.sort();
    Ok(subjects)
}

/// Subjects without a directory under the input directory.
pub fn missing_subjects(input_dir: &Utf8Path, subjects: &[String]) -> Vec<String> {
    subjects
        .iter()
        .filter(|subject| !input_dir.join(subject.as_str()).exists())
        .cloned()
        .collect()
}

pub fn check_subjects(input_dir: &Utf8Path, subjects: &[String]) -> Result<(), ValidationError> {
    if subjects.is_empty() {
        return Err(ValidationError::EmptySubjects);
    }
    let missing = missing_subjects(input_dir, subjects);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingSubjects {
            input: input_dir.to_path_buf(),
            missing,
        })
    }
}

pub fn check_file(path: &Utf8Path, label: &str) -> Result<(), ValidationError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ValidationError::MissingFile {
            label: label.to_string(),
            path: path.to_path_buf(),
        })
    }
}

pub fn check_dir(path: &Utf8Path, label: &str) -> Result<(), ValidationError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(ValidationError::MissingDir {
            label: label.to_string(),
            path: path.to_path_buf(),
        })
    }
}

/// A directory that exists, or whose closest existing ancestor is a directory.
pub fn check_creatable(path: &Utf8Path, label: &str) -> Result<(), ValidationError> {
    let missing = || ValidationError::MissingDir {
        label: label.to_string(),
        path: path.to_path_buf(),
    };
    match path.ancestors().find(|ancestor| ancestor.exists()) {
        Some(ancestor) if ancestor.is_dir() => Ok(()),
        Some(_) => Err(missing()),
        // Relative path with no existing component resolves against cwd
        None if path.is_relative() => Ok(()),
        None => Err(missing()),
    }
}

/// Whether a directory is a C-PAC source checkout usable for patching.
pub fn cpac_dir_valid(path: &Utf8Path) -> bool {
    path.is_dir()
        && path.join("dev/docker_data/run.py").exists()
        && path.join("dev/docker_data/run-with-freesurfer.sh").exists()
}

pub fn check_cpac_dir(path: &Utf8Path) -> Result<(), ValidationError> {
    if cpac_dir_valid(path) {
        Ok(())
    } else {
        Err(ValidationError::InvalidCpacDir(path.to_path_buf()))
    }
}

/// Make a path absolute against the current directory without touching symlinks.
pub fn absolute(path: &Utf8Path) -> io::Result<Utf8PathBuf> {
    let absolute = std::path::absolute(path)?;
    Utf8PathBuf::from_path_buf(absolute).map_err(|p| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("path is not valid UTF-8: {}", p.display()),
        )
    })
}
