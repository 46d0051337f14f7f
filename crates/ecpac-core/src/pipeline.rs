//! Pipeline selection: C-PAC preconfigs or pipeline config files.

use crate::error::ValidationError;
use crate::preset::Preset;
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;

/// A single pipeline to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pipeline {
    /// Built-in preconfig (`--preconfig NAME`)
    Preset(Preset),
    /// Pipeline config file (`--pipeline-file PATH`)
    ConfigFile(Utf8PathBuf),
}

impl Pipeline {
    /// C-PAC flag selecting this pipeline.
    pub fn cpac_flag(&self) -> &'static str {
        match self {
            Self::Preset(_) => "--preconfig",
            Self::ConfigFile(_) => "--pipeline-file",
        }
    }

    /// Value following [`Pipeline::cpac_flag`].
    pub fn cpac_value(&self) -> &str {
        match self {
            Self::Preset(preset) => preset.as_str(),
            Self::ConfigFile(path) => path.as_str(),
        }
    }

    /// Directory name used for this pipeline inside a run.
    ///
    /// Presets use their name. Config files are prefixed with their
    /// position so two files with the same stem never collide.
    pub fn id(&self, index: usize) -> String {
        match self {
            Self::Preset(preset) => preset.as_str().to_string(),
            Self::ConfigFile(path) => {
                let stem = path.file_stem().unwrap_or("pipeline");
                format!("{:03}_{}", index, stem)
            }
        }
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cpac_value())
    }
}

/// Non-empty list of pipelines that are either all presets or all files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSelection {
    pipelines: Vec<Pipeline>,
}

impl PipelineSelection {
    /// Classify user tokens as presets or config files.
    ///
    /// `resolve_file` returns the absolute path of an existing config file,
    /// or None when the token does not name one.
    pub fn parse<S, F>(tokens: &[S], resolve_file: F) -> Result<Self, ValidationError>
    where
        S: AsRef<str>,
        F: Fn(&str) -> Option<Utf8PathBuf>,
    {
        if tokens.is_empty() {
            return Err(ValidationError::EmptyPipelines);
        }

        let mut presets = Vec::new();
        let mut files = Vec::new();

        for token in tokens {
            let token = token.as_ref();
            if let Ok(preset) = token.parse::<Preset>() {
                presets.push(preset);
                continue;
            }
            match resolve_file(token) {
                Some(path) => files.push(path),
                None if looks_like_path(token) => {
                    return Err(ValidationError::MissingFile {
                        label: "Pipeline config".to_string(),
                        path: token.into(),
                    });
                }
                None => return Err(ValidationError::UnknownPreset(token.to_string())),
            }
        }

        if !presets.is_empty() && !files.is_empty() {
            return Err(ValidationError::MixedPipelines {
                presets: presets.iter().map(|p| p.to_string()).collect(),
                files: files.iter().map(|f| f.to_string()).collect(),
            });
        }

        let pipelines = if files.is_empty() {
            presets.into_iter().map(Pipeline::Preset).collect()
        } else {
            files.into_iter().map(Pipeline::ConfigFile).collect()
        };

        Ok(Self { pipelines })
    }

    /// Classify tokens, resolving config files against the filesystem.
    pub fn resolve<S: AsRef<str>>(tokens: &[S]) -> Result<Self, ValidationError> {
        Self::parse(tokens, |token| {
            let path = Utf8Path::new(token);
            if path.is_file() {
                crate::request::absolute(path).ok()
            } else {
                None
            }
        })
    }

    /// Selection holding a single preset.
    pub fn preset(preset: Preset) -> Self {
        Self {
            pipelines: vec![Pipeline::Preset(preset)],
        }
    }

    pub fn pipelines(&self) -> &[Pipeline] {
        &self.pipelines
    }

    pub fn uses_presets(&self) -> bool {
        matches!(self.pipelines.first(), Some(Pipeline::Preset(_)))
    }

    /// Values as typed on the command line, for reproducing the call.
    pub fn tokens(&self) -> Vec<&str> {
        self.pipelines.iter().map(Pipeline::cpac_value).collect()
    }
}

impl Default for PipelineSelection {
    fn default() -> Self {
        Self::preset(Preset::default())
    }
}

fn looks_like_path(token: &str) -> bool {
    token.contains('/')
        || Utf8Path::new(token)
            .extension()
            .is_some_and(|ext| matches!(ext, "yml" | "yaml"))
}
