//! The `ecpac` command line reproducing a run.

use crate::args::Args;
use clap::Parser;
use ecpac_core::{JobRequest, ValidationError};
use ecpac_parsers::{format_gb, format_hours};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CallError {
    #[error("Command line does not split into shell words")]
    Split,
    #[error(transparent)]
    Clap(#[from] clap::Error),
}

/// Render the `ecpac` invocation that answers every prompt of this request.
pub fn render_ecpac_call(request: &JobRequest) -> Result<String, ValidationError> {
    let mut args: Vec<String> = vec!["ecpac".to_string()];
    let mut push = |flag: &str, value: String| {
        args.push(flag.to_string());
        args.push(value);
    };

    push("--run", request.run_name.clone());
    push("--input", request.input_dir.to_string());
    push("--output", request.output_dir.to_string());
    push("--image", request.image.to_string());
    push("--subject", request.subjects.join(" "));
    push("--pipeline", request.pipelines.tokens().join(" "));
    push("--analysis_level", request.analysis_level.to_string());
    if let Some(cpac) = &request.cpac_sources {
        push("--cpac", cpac.to_string());
    }
    push("--memory_gb", format_gb(request.resources.memory_gb));
    push("--threads", request.resources.threads.to_string());
    push("--duration_h", format_hours(request.resources.duration));
    if !request.extra_cpac_args.trim().is_empty() {
        push("--extra_cpac_args", request.extra_cpac_args.trim().to_string());
    }
    if request.save_working_dir {
        args.push("--save_working_dir".to_string());
    }

    shlex::try_join(args.iter().map(String::as_str))
        .map_err(|e| ValidationError::Unquotable(e.to_string()))
}

/// Parse a rendered `ecpac` call back into arguments.
pub fn parse_ecpac_call(command: &str) -> Result<Args, CallError> {
    let words = shlex::split(command).ok_or(CallError::Split)?;
    Ok(Args::try_parse_from(words)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecpac_core::{AnalysisLevel, PipelineSelection, Resources};
    use ecpac_parsers::{option_truthy, split_list};
    use std::time::Duration;

    fn request() -> JobRequest {
        JobRequest {
            run_name: "run 24-01-01".to_string(),
            subjects: vec!["sub-01".to_string(), "sub-02".to_string()],
            pipelines: PipelineSelection::parse(&["default", "rbc-options"], |_| None).unwrap(),
            analysis_level: AnalysisLevel::TestConfig,
            input_dir: "/ocean/my data/bids".into(),
            output_dir: "/ocean/runs".into(),
            image: "/ocean/images/cpac.sif".into(),
            cpac_sources: Some("/home/me/C-PAC".into()),
            resources: Resources {
                threads: 4,
                memory_gb: 7.5,
                duration: Duration::from_secs(5400),
            },
            save_working_dir: true,
            extra_cpac_args: "--num_ants_threads 2".to_string(),
            webhook_url: None,
        }
    }

    #[test]
    fn test_round_trip_recovers_subjects_and_presets() {
        let call = render_ecpac_call(&request()).unwrap();
        let args = parse_ecpac_call(&call).unwrap();

        assert_eq!(split_list(&args.subject.unwrap()), vec!["sub-01", "sub-02"]);
        assert_eq!(
            split_list(&args.pipeline.unwrap()),
            vec!["default", "rbc-options"]
        );
        assert_eq!(args.run.as_deref(), Some("run 24-01-01"));
        assert_eq!(args.input.unwrap(), "/ocean/my data/bids");
        assert_eq!(args.analysis_level.as_deref(), Some("test_config"));
        assert_eq!(args.cpac.unwrap(), "/home/me/C-PAC");
        assert_eq!(args.memory_gb.as_deref(), Some("7.5"));
        assert_eq!(args.threads.as_deref(), Some("4"));
        assert_eq!(args.duration_h.as_deref(), Some("1.5"));
        assert_eq!(args.extra_cpac_args.as_deref(), Some("--num_ants_threads 2"));
        assert_eq!(option_truthy(args.save_working_dir.as_deref()), Some(true));
    }

    #[test]
    fn test_optional_flags_left_out() {
        let mut request = request();
        request.cpac_sources = None;
        request.save_working_dir = false;
        request.extra_cpac_args = String::new();
        let call = render_ecpac_call(&request).unwrap();
        assert!(call.starts_with("ecpac --run"));
        assert!(!call.contains("--cpac"));
        assert!(!call.contains("--save_working_dir"));
        assert!(!call.contains("--extra_cpac_args"));

        let args = parse_ecpac_call(&call).unwrap();
        assert!(args.save_working_dir.is_none());
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            parse_ecpac_call("ecpac --run 'unterminated"),
            Err(CallError::Split)
        ));
        assert!(matches!(
            parse_ecpac_call("ecpac --bogus"),
            Err(CallError::Clap(_))
        ));
    }
}
