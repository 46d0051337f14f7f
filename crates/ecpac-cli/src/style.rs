//! Icons and colours used on the console.

use crossterm::style::{StyledContent, Stylize};

pub const ICON_FOLDER: &str = "\u{1F4C1}";
pub const ICON_JOB: &str = "\u{1F4C3}";
pub const ICON_CPAC: &str = "\u{1F4BE}";
pub const ICON_MEMORY: &str = "\u{1F4C8}";
pub const ICON_THREADS: &str = "\u{1F4E1}";
pub const ICON_DURATION: &str = "\u{1F552}";
pub const ICON_SAVE: &str = "\u{1F4BE}";
pub const ICON_EXTRA_ARGS: &str = "\u{1F4AC}";
pub const ICON_PIPELINE: &str = "\u{1F6B0}";
pub const ICON_ANALYSIS_LEVEL: &str = "\u{1F4C8}";
pub const ICON_LAUNCH: &str = "\u{1F680}";
pub const ICON_PREVIEW: &str = "\u{1F50D}";
pub const ICON_SINGULARITY: &str = "\u{1F5BC}";
pub const ICON_SUBJECT: &str = "\u{1F464}";

/// Prompt label: icon followed by blue text.
pub fn label(icon: &str, text: &str) -> String {
    format!("{} {}", icon, text.blue())
}

/// Prompt label for decisions with side effects.
pub fn label_emph(icon: &str, text: &str) -> String {
    format!("{} {}", icon, text.black().on_blue())
}

pub fn error(text: &str) -> StyledContent<&str> {
    text.red()
}

pub fn warning(text: &str) -> StyledContent<&str> {
    text.yellow()
}

pub fn heading(text: &str) -> StyledContent<&str> {
    text.on_blue()
}
