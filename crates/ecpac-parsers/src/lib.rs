//! Shared parsing utilities for ecpac.
//!
//! Small helpers used by the core, SLURM and CLI crates: user input
//! normalisation, duration and memory formatting for `#SBATCH` headers,
//! and an async subprocess runner.

pub mod command;
pub mod memory;
pub mod time;

pub use command::{run_command, CommandError};
pub use memory::{access_gb_to_mb, format_gb, parse_gb};
pub use time::{format_hms, format_hours, parse_duration, parse_hours};

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Filter helper for optional string fields.
/// Returns None if the string is empty or only whitespace.
pub fn non_empty_string(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Split a whitespace-separated list (subjects, pipelines).
///
/// Leading, trailing and repeated whitespace never produce empty items.
pub fn split_list(s: &str) -> Vec<String> {
    WHITESPACE
        .split(s.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Convert a string option to a boolean.
///
/// `true`, `y`, `yes` and `1` (any case) are truthy, anything else is false.
pub fn option_truthy(opt: Option<&str>) -> Option<bool> {
    opt.map(|value| {
        matches!(
            value.trim().to_lowercase().as_str(),
            "true" | "y" | "yes" | "1"
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_string() {
        assert_eq!(non_empty_string("hello"), Some("hello".to_string()));
        assert_eq!(non_empty_string("  hello  "), Some("hello".to_string()));
        assert_eq!(non_empty_string(""), None);
        assert_eq!(non_empty_string("   "), None);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("sub-01 sub-02"), vec!["sub-01", "sub-02"]);
        assert_eq!(
            split_list("  sub-01 \t\n sub-02  "),
            vec!["sub-01", "sub-02"]
        );
        assert!(split_list("").is_empty());
        assert!(split_list("   ").is_empty());
    }

    #[test]
    fn test_option_truthy() {
        assert_eq!(option_truthy(None), None);
        assert_eq!(option_truthy(Some("true")), Some(true));
        assert_eq!(option_truthy(Some("Y")), Some(true));
        assert_eq!(option_truthy(Some("YES")), Some(true));
        assert_eq!(option_truthy(Some("1")), Some(true));
        assert_eq!(option_truthy(Some("no")), Some(false));
        assert_eq!(option_truthy(Some("")), Some(false));
    }
}
