//! Rendering and re-parsing of the Singularity command that runs C-PAC.

use crate::analysis::AnalysisLevel;
use crate::error::ValidationError;
use crate::pipeline::Pipeline;
use crate::preset::Preset;
use camino::Utf8PathBuf;
use ecpac_parsers::format_gb;

/// One C-PAC container call for a single subject and pipeline.
#[derive(Debug, Clone)]
pub struct CpacInvocation {
    pub image: Utf8PathBuf,
    pub input_dir: Utf8PathBuf,
    pub output_dir: Utf8PathBuf,
    pub analysis_level: AnalysisLevel,
    pub threads: u32,
    pub memory_gb: f64,
    pub subject: String,
    pub pipeline: Pipeline,
    /// C-PAC checkout bound over the image's code
    pub cpac_sources: Option<Utf8PathBuf>,
    /// Where C-PAC keeps its working directory, when it should be saved
    pub save_working_dir: Option<Utf8PathBuf>,
    /// Appended verbatim, already shell syntax
    pub extra_args: String,
}

/// Subject and pipeline recovered from a rendered command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInvocation {
    pub subject: String,
    pub pipeline: Pipeline,
}

impl CpacInvocation {
    /// Argument vector, without the verbatim extra arguments.
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = vec!["singularity".into(), "run".into(), "--cleanenv".into()];

        // Patch C-PAC sources if available
        if let Some(sources) = &self.cpac_sources {
            args.extend([
                "-B".to_string(),
                format!("{}/CPAC:/code/CPAC", sources),
                "-B".to_string(),
                format!("{}/dev/docker_data/run.py:/code/run.py", sources),
                "-B".to_string(),
                format!("{}/dev/docker_data:/cpac_resources", sources),
            ]);
        }

        args.extend([
            "-B".to_string(),
            format!("{0}:{0}:ro", self.input_dir),
            "-B".to_string(),
            format!("{0}:{0}", self.output_dir),
            self.image.to_string(),
            self.input_dir.to_string(),
            self.output_dir.to_string(),
            self.analysis_level.to_string(),
            "--skip_bids_validator".to_string(),
            "--n_cpus".to_string(),
            self.threads.to_string(),
            "--mem_gb".to_string(),
            format_gb(self.memory_gb),
            "--participant_label".to_string(),
            self.subject.clone(),
            self.pipeline.cpac_flag().to_string(),
            self.pipeline.cpac_value().to_string(),
        ]);

        args
    }

    /// Shell command line, arguments quoted where needed.
    pub fn render(&self) -> Result<String, ValidationError> {
        let args = self.args();
        let mut command = shlex::try_join(args.iter().map(String::as_str))
            .map_err(|e| ValidationError::Unquotable(e.to_string()))?;

        let extra = self.extra_args.trim();
        if !extra.is_empty() {
            command.push(' ');
            command.push_str(extra);
        }

        if let Some(wd) = &self.save_working_dir {
            let quoted = shlex::try_quote(wd.as_str())
                .map_err(|e| ValidationError::Unquotable(e.to_string()))?;
            command.push_str(" --save_working_dir ");
            command.push_str(&quoted);
        }

        Ok(command)
    }

    /// Recover the subject and pipeline from a rendered command line.
    ///
    /// Returns None when the line does not split as shell words or lacks
    /// either argument.
    pub fn parse(command: &str) -> Option<ParsedInvocation> {
        let words = shlex::split(command)?;
        let value_after = |flag: &str| {
            words
                .iter()
                .position(|word| word == flag)
                .and_then(|i| words.get(i + 1))
                .cloned()
        };

        let subject = value_after("--participant_label")?;
        let pipeline = if let Some(name) = value_after("--preconfig") {
            Pipeline::Preset(name.parse::<Preset>().ok()?)
        } else {
            Pipeline::ConfigFile(value_after("--pipeline-file")?.into())
        };

        Some(ParsedInvocation { subject, pipeline })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation() -> CpacInvocation {
        CpacInvocation {
            image: "/ocean/images/cpac.sif".into(),
            input_dir: "/ocean/data/bids".into(),
            output_dir: "/ocean/runs/run_a/default/sub-01/output".into(),
            analysis_level: AnalysisLevel::Participant,
            threads: 7,
            memory_gb: 15.0,
            subject: "sub-01".to_string(),
            pipeline: Pipeline::Preset(Preset::Default),
            cpac_sources: None,
            save_working_dir: None,
            extra_args: String::new(),
        }
    }

    #[test]
    fn test_render_references_all_paths() {
        let command = invocation().render().unwrap();
        assert!(command.starts_with("singularity run --cleanenv"));
        let words = shlex::split(&command).unwrap();
        for expected in [
            "/ocean/images/cpac.sif",
            "/ocean/data/bids",
            "/ocean/runs/run_a/default/sub-01/output",
            "participant",
            "--skip_bids_validator",
        ] {
            assert!(words.iter().any(|w| w == expected), "missing {}", expected);
        }
        assert!(words.windows(2).any(|w| w[0] == "--n_cpus" && w[1] == "7"));
        assert!(words.windows(2).any(|w| w[0] == "--mem_gb" && w[1] == "15.0"));
        assert!(words.contains(&"/ocean/data/bids:/ocean/data/bids:ro".to_string()));
    }

    #[test]
    fn test_render_quotes_paths_with_spaces() {
        let mut inv = invocation();
        inv.input_dir = "/ocean/my data/bids".into();
        let words = shlex::split(&inv.render().unwrap()).unwrap();
        assert!(words.contains(&"/ocean/my data/bids".to_string()));
    }

    #[test]
    fn test_render_patched_sources() {
        let mut inv = invocation();
        inv.cpac_sources = Some("/home/me/C-PAC".into());
        let words = shlex::split(&inv.render().unwrap()).unwrap();
        assert!(words.contains(&"/home/me/C-PAC/CPAC:/code/CPAC".to_string()));
        assert!(words.contains(&"/home/me/C-PAC/dev/docker_data:/cpac_resources".to_string()));
    }

    #[test]
    fn test_render_appends_extra_args_and_working_dir() {
        let mut inv = invocation();
        inv.extra_args = "--num_ants_threads 2".to_string();
        inv.save_working_dir = Some("/ocean/runs/run_a/default/sub-01/wd".into());
        let command = inv.render().unwrap();
        assert!(command.ends_with(
            "--preconfig default --num_ants_threads 2 --save_working_dir /ocean/runs/run_a/default/sub-01/wd"
        ));
    }

    #[test]
    fn test_round_trip_preset() {
        let inv = invocation();
        let parsed = CpacInvocation::parse(&inv.render().unwrap()).unwrap();
        assert_eq!(parsed.subject, "sub-01");
        assert_eq!(parsed.pipeline, Pipeline::Preset(Preset::Default));
    }

    #[test]
    fn test_round_trip_config_file() {
        let mut inv = invocation();
        inv.subject = "sub 02".to_string();
        inv.pipeline = Pipeline::ConfigFile("/configs/my pipe.yml".into());
        let parsed = CpacInvocation::parse(&inv.render().unwrap()).unwrap();
        assert_eq!(parsed.subject, "sub 02");
        assert_eq!(parsed.pipeline, inv.pipeline);
    }

    #[test]
    fn test_parse_rejects_incomplete_commands() {
        assert!(CpacInvocation::parse("singularity run image.sif").is_none());
        assert!(CpacInvocation::parse("echo 'unterminated").is_none());
        assert!(CpacInvocation::parse("x --participant_label s --preconfig nope").is_none());
    }
}
