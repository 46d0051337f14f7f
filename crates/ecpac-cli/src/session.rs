//! Collect a [`JobRequest`] from flags and prompts.

use crate::args::Args;
use crate::prompt::{PromptError, Prompter};
use crate::settings::Settings;
use crate::style::{self, label};
use camino::Utf8PathBuf;
use chrono::Local;
use ecpac_core::{
    check_cpac_dir, check_creatable, check_dir, check_file, check_subjects, dedup_subjects,
    discover_subjects, AnalysisLevel, JobRequest, PipelineSelection, Preset, Resources,
    ValidationError,
};
use ecpac_parsers::{
    non_empty_string, option_truthy, parse_duration, parse_gb, parse_hours, split_list,
};
use std::io::{BufRead, Write};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Can not list subjects in input directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("User directory \"{0}\" does not exist; pass --yes to run outside PSC")]
    NotOnPsc(String),
}

/// Warn when `$PROJECT` is missing and decide whether to go on.
///
/// Interactive sessions ask. Otherwise only `yes` continues, and stopping
/// is an error.
pub fn confirm_location<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    settings: &Settings,
    yes: bool,
) -> Result<bool, SessionError> {
    if settings.on_psc() {
        return Ok(true);
    }

    let project = settings
        .project_dir
        .as_ref()
        .map(|p| p.to_string())
        .unwrap_or_default();
    prompter.error(format!(
        "User directory does not exist! \"{}\" (This script is meant to run on PSC)",
        project
    ))?;

    if yes {
        return Ok(true);
    }
    if !prompter.is_interactive() {
        return Err(SessionError::NotOnPsc(project));
    }
    let label = style::error("Continue anyway?").to_string();
    Ok(prompter.confirm(&label, Some(false))?)
}

/// One pass through the questions, flags answering their prompt.
///
/// Invalid answers are reported and asked again when interactive, and are
/// fatal otherwise.
pub struct Session<'a, R, W> {
    args: Args,
    settings: &'a Settings,
    prompter: &'a mut Prompter<R, W>,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(args: Args, settings: &'a Settings, prompter: &'a mut Prompter<R, W>) -> Self {
        Self {
            args,
            settings,
            prompter,
        }
    }

    /// Ask every question and return the validated request.
    pub fn collect(mut self) -> Result<JobRequest, SessionError> {
        let Args {
            input,
            output,
            run,
            image,
            subject,
            pipeline,
            analysis_level,
            cpac,
            memory_gb,
            threads,
            duration_h,
            save_working_dir,
            extra_cpac_args,
            ..
        } = std::mem::take(&mut self.args);
        let settings = self.settings;

        let run_name = self.ask(
            run,
            "run name",
            &label(style::ICON_JOB, "Run name"),
            Some(Local::now().format("run_%y-%m-%d_%H-%M-%S").to_string()),
            |s| non_empty_string(s).ok_or(ValidationError::EmptyRunName),
        )?;

        let threads = self.ask(
            threads,
            "threads",
            &label(
                style::ICON_THREADS,
                "Number of threads/cores (int) (C-PAC will get 1 less)",
            ),
            Some(Resources::DEFAULT_THREADS.to_string()),
            |s| {
                s.trim()
                    .parse::<u32>()
                    .ok()
                    .filter(|t| *t > 0)
                    .ok_or_else(|| invalid("threads", s))
            },
        )?;

        let memory_gb = self.ask(
            memory_gb,
            "memory",
            &label(
                style::ICON_MEMORY,
                "Memory (GB, float) (C-PAC will get 1GB less)",
            ),
            Some(format!("{:.1}", Resources::default_memory_gb(threads))),
            |s| parse_gb(s).ok_or_else(|| invalid("memory", s)),
        )?;

        let duration = self.ask(
            duration_h,
            "duration",
            &label(style::ICON_DURATION, "Duration (hours, float)"),
            Some(format!("{:.1}", Resources::DEFAULT_DURATION_HOURS as f64)),
            parse_duration_hours,
        )?;

        let image = self.ask(
            image.map(String::from),
            "image",
            &label(style::ICON_SINGULARITY, "Image file"),
            Some(settings.default_image().to_string()),
            |s| {
                let path = Utf8PathBuf::from(s);
                check_file(&path, "Singularity image").map(|_| path)
            },
        )?;

        let cpac_sources = self.ask(
            cpac.map(String::from),
            "C-PAC directory",
            &label(
                style::ICON_CPAC,
                "C-PAC directory (empty to use image version)",
            ),
            Some(String::new()),
            |s| match non_empty_string(s) {
                None => Ok(None),
                Some(dir) => {
                    let path = Utf8PathBuf::from(dir);
                    check_cpac_dir(&path).map(|_| Some(path))
                }
            },
        )?;

        let input_dir = self.ask(
            input.map(String::from),
            "input directory",
            &label(style::ICON_FOLDER, "Input directory"),
            None,
            |s| {
                let path = Utf8PathBuf::from(s);
                check_dir(&path, "Input").map(|_| path)
            },
        )?;

        let found = discover_subjects(&input_dir)?;
        tracing::debug!(count = found.len(), "found subject folders");
        let subjects = self.ask(
            subject,
            "subjects",
            &label(style::ICON_SUBJECT, "Subjects (separate with space)"),
            Some(found.join(" ")),
            |s| {
                let subjects = dedup_subjects(split_list(s));
                check_subjects(&input_dir, &subjects).map(|_| subjects)
            },
        )?;

        let output_dir = self.ask(
            output.map(String::from),
            "output directory",
            &label(style::ICON_FOLDER, "Output directory"),
            Some(settings.default_output().to_string()),
            |s| {
                let path = Utf8PathBuf::from(s);
                check_creatable(&path, "Output").map(|_| path)
            },
        )?;

        let pipelines = self.ask(
            pipeline,
            "pipelines",
            &label(style::ICON_PIPELINE, "Pipelines (separate with space)"),
            Some(Preset::default().to_string()),
            |s| PipelineSelection::resolve(&split_list(s)),
        )?;

        let analysis_level = self.ask(
            analysis_level,
            "analysis level",
            &label(
                style::ICON_ANALYSIS_LEVEL,
                "Analysis level [participant|group|test_config]",
            ),
            Some(AnalysisLevel::default().to_string()),
            |s| s.parse::<AnalysisLevel>(),
        )?;

        let save_working_dir = match option_truthy(save_working_dir.as_deref()) {
            Some(save) => save,
            None => self
                .prompter
                .confirm(&label(style::ICON_SAVE, "Save working directory"), Some(false))?,
        };

        let extra_cpac_args = self.ask(
            extra_cpac_args,
            "extra C-PAC args",
            &label(style::ICON_EXTRA_ARGS, "Extra args to pass to C-PAC?"),
            Some(String::new()),
            |s| match shlex::split(s) {
                Some(_) => Ok(s.trim().to_string()),
                None => Err(ValidationError::Unquotable(s.to_string())),
            },
        )?;

        let request = JobRequest {
            run_name,
            subjects,
            pipelines,
            analysis_level,
            input_dir,
            output_dir,
            image,
            cpac_sources,
            resources: Resources {
                threads,
                memory_gb,
                duration,
            },
            save_working_dir,
            extra_cpac_args,
            webhook_url: settings.webhook.as_ref().map(|w| w.url().to_string()),
        };
        request.validate()?;
        Ok(request)
    }

    /// Take the flag value or prompt, parsing until a valid value is given.
    fn ask<T, F>(
        &mut self,
        flag: Option<String>,
        field: &str,
        label: &str,
        default: Option<String>,
        parse: F,
    ) -> Result<T, SessionError>
    where
        F: Fn(&str) -> Result<T, ValidationError>,
    {
        let mut flag = flag;
        loop {
            let raw = match flag.take() {
                Some(value) => value,
                None => self.prompter.text(field, label, default.as_deref())?,
            };
            match parse(&raw) {
                Ok(value) => return Ok(value),
                Err(e) if self.prompter.is_interactive() => self.prompter.error(e)?,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

fn invalid(field: &str, value: &str) -> ValidationError {
    ValidationError::InvalidNumber {
        field: field.to_string(),
        value: value.to_string(),
    }
}

/// Hours as a number, or a SLURM-style `HH:MM:SS` limit.
fn parse_duration_hours(s: &str) -> Result<Duration, ValidationError> {
    parse_hours(s)
        .or_else(|| s.contains(':').then(|| parse_duration(s.trim())).flatten())
        .filter(|d| !d.is_zero())
        .ok_or_else(|| invalid("duration", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        root: Utf8PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
            fs::create_dir_all(root.join("bids/sub-01")).unwrap();
            fs::create_dir_all(root.join("bids/sub-02")).unwrap();
            fs::create_dir_all(root.join("images")).unwrap();
            fs::write(root.join("images/cpac.sif"), "").unwrap();
            Self { _temp: temp, root }
        }

        fn settings(&self) -> Settings {
            Settings::new(Some(self.root.clone()), None)
        }
    }

    fn run(
        args: Args,
        settings: &Settings,
        input: &str,
        interactive: bool,
    ) -> (Result<JobRequest, SessionError>, String) {
        let mut prompter = Prompter::new(
            Cursor::new(input.as_bytes().to_vec()),
            Vec::new(),
            interactive,
        );
        let result = Session::new(args, settings, &mut prompter).collect();
        let output = String::from_utf8(prompter.output().clone()).unwrap();
        (result, output)
    }

    #[test]
    fn test_non_interactive_with_flags() {
        let fixture = Fixture::new();
        let args = Args {
            input: Some(fixture.root.join("bids")),
            run: Some("run_a".to_string()),
            threads: Some("4".to_string()),
            ..Args::default()
        };
        let (result, output) = run(args, &fixture.settings(), "", false);
        let request = result.unwrap();

        assert!(output.is_empty());
        assert_eq!(request.run_name, "run_a");
        assert_eq!(request.subjects, vec!["sub-01", "sub-02"]);
        assert_eq!(request.resources.threads, 4);
        assert_eq!(request.resources.memory_gb, 8.0);
        assert_eq!(request.resources.duration, Duration::from_secs(48 * 3600));
        assert_eq!(request.image, fixture.root.join("images/cpac.sif"));
        assert_eq!(request.output_dir, fixture.root.join("ecpac_runs"));
        assert_eq!(request.pipelines, PipelineSelection::preset(Preset::Default));
        assert_eq!(request.analysis_level, AnalysisLevel::Participant);
        assert!(request.cpac_sources.is_none());
        assert!(!request.save_working_dir);
    }

    #[test]
    fn test_non_interactive_requires_input_dir() {
        let fixture = Fixture::new();
        let (result, _) = run(Args::default(), &fixture.settings(), "", false);
        match result {
            Err(SessionError::Prompt(PromptError::MissingValue(field))) => {
                assert_eq!(field, "input directory")
            }
            other => panic!("expected missing input directory, got {:?}", other),
        }
    }

    #[test]
    fn test_non_interactive_unknown_preset_fails() {
        let fixture = Fixture::new();
        let args = Args {
            input: Some(fixture.root.join("bids")),
            pipeline: Some("default nope".to_string()),
            ..Args::default()
        };
        let (result, _) = run(args, &fixture.settings(), "", false);
        assert!(matches!(
            result,
            Err(SessionError::Validation(ValidationError::UnknownPreset(p))) if p == "nope"
        ));
    }

    #[test]
    fn test_non_interactive_empty_subjects_fails() {
        let fixture = Fixture::new();
        fs::create_dir_all(fixture.root.join("empty")).unwrap();
        let args = Args {
            input: Some(fixture.root.join("empty")),
            ..Args::default()
        };
        let (result, _) = run(args, &fixture.settings(), "", false);
        assert!(matches!(
            result,
            Err(SessionError::Validation(ValidationError::EmptySubjects))
        ));
    }

    #[test]
    fn test_interactive_reprompts_invalid_answers() {
        let fixture = Fixture::new();
        let input = [
            "run_b",                               // run name
            "zero",                                // threads (invalid)
            "2",                                   // threads
            "",                                    // memory -> 4.0
            "12",                                  // duration
            "",                                    // image default
            "",                                    // no C-PAC patching
            fixture.root.join("missing").as_str(), // input (invalid)
            fixture.root.join("bids").as_str(),    // input
            "sub-01 sub-03",                       // subjects (sub-03 missing)
            "sub-01 sub-01",                       // subjects
            "",                                    // output default
            "default nope",                        // pipelines (invalid)
            "anat-only blank",                     // pipelines
            "subject",                             // analysis level (invalid)
            "group",                               // analysis level
            "y",                                   // save working dir
            "--num_ants_threads 1",                // extra args
        ]
        .join("\n")
            + "\n";

        let (result, output) = run(Args::default(), &fixture.settings(), &input, true);
        let request = result.unwrap();

        assert_eq!(request.run_name, "run_b");
        assert_eq!(request.resources.threads, 2);
        assert_eq!(request.resources.memory_gb, 4.0);
        assert_eq!(request.resources.duration, Duration::from_secs(12 * 3600));
        assert_eq!(request.subjects, vec!["sub-01"]);
        assert_eq!(request.pipelines.tokens(), vec!["anat-only", "blank"]);
        assert_eq!(request.analysis_level, AnalysisLevel::Group);
        assert!(request.save_working_dir);
        assert_eq!(request.extra_cpac_args, "--num_ants_threads 1");

        assert!(output.contains("Invalid threads"));
        assert!(output.contains("Input directory does not exist"));
        assert!(output.contains("\"sub-03\""));
        assert!(output.contains("Unknown preset \"nope\""));
        assert!(output.contains("Analysis level invalid"));
    }

    #[test]
    fn test_interactive_eof_cancels() {
        let fixture = Fixture::new();
        let (result, _) = run(Args::default(), &fixture.settings(), "run_c\n", true);
        assert!(matches!(
            result,
            Err(SessionError::Prompt(PromptError::Cancelled))
        ));
    }

    fn prompter(input: &str, interactive: bool) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(
            Cursor::new(input.as_bytes().to_vec()),
            Vec::new(),
            interactive,
        )
    }

    #[test]
    fn test_confirm_location_on_psc() {
        let fixture = Fixture::new();
        let mut p = prompter("", false);
        assert!(confirm_location(&mut p, &fixture.settings(), false).unwrap());
        assert!(p.output().is_empty());
    }

    #[test]
    fn test_confirm_location_non_interactive_off_psc_fails() {
        let fixture = Fixture::new();
        let settings = Settings::new(Some(fixture.root.join("no-such-project")), None);
        let mut p = prompter("", false);
        match confirm_location(&mut p, &settings, false) {
            Err(SessionError::NotOnPsc(project)) => assert!(project.ends_with("no-such-project")),
            other => panic!("expected NotOnPsc, got {:?}", other),
        }

        let mut p = prompter("", false);
        assert!(confirm_location(&mut p, &settings, true).unwrap());
    }

    #[test]
    fn test_confirm_location_interactive_asks() {
        let settings = Settings::default();
        let mut p = prompter("n\n", true);
        assert!(!confirm_location(&mut p, &settings, false).unwrap());
        let output = String::from_utf8(p.output().clone()).unwrap();
        assert!(output.contains("meant to run on PSC"));
        assert!(output.contains("Continue anyway?"));

        let mut p = prompter("y\n", true);
        assert!(confirm_location(&mut p, &settings, false).unwrap());
    }

    #[test]
    fn test_parse_duration_hours() {
        assert_eq!(
            parse_duration_hours("1.5").unwrap(),
            Duration::from_secs(5400)
        );
        assert_eq!(
            parse_duration_hours("36:00:00").unwrap(),
            Duration::from_secs(36 * 3600)
        );
        assert!(parse_duration_hours("0").is_err());
        assert!(parse_duration_hours("soon").is_err());
        assert!(parse_duration_hours("1e20").is_err());
        assert!(parse_duration_hours("12:3O:00").is_err());
        assert!(parse_duration_hours("-5:00").is_err());
        assert!(parse_duration_hours("999999999999999-00:00:00").is_err());
    }
}
