//! Line-based prompts on a reader/writer pair.

use crate::style;
use std::fmt::Display;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PromptError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Cancelled by user")]
    Cancelled,
    #[error("No value for \"{0}\" and prompting is disabled")]
    MissingValue(String),
}

/// Asks questions on `output` and reads answers from `input`.
///
/// When not interactive, every question resolves to its default without
/// reading or printing anything.
pub struct Prompter<R, W> {
    input: R,
    output: W,
    interactive: bool,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W, interactive: bool) -> Self {
        Self {
            input,
            output,
            interactive,
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Ask for a line of text.
    ///
    /// An empty answer takes the default; without a default the question
    /// is repeated. `field` names the value in errors.
    pub fn text(
        &mut self,
        field: &str,
        label: &str,
        default: Option<&str>,
    ) -> Result<String, PromptError> {
        if !self.interactive {
            return default
                .map(str::to_string)
                .ok_or_else(|| PromptError::MissingValue(field.to_string()));
        }

        loop {
            match default {
                Some(d) if !d.is_empty() => write!(self.output, "{} [{}]: ", label, d)?,
                _ => write!(self.output, "{}: ", label)?,
            }
            let answer = self.read_line()?;

            if !answer.is_empty() {
                return Ok(answer);
            }
            if let Some(d) = default {
                return Ok(d.to_string());
            }
        }
    }

    /// Ask a yes/no question.
    pub fn confirm(&mut self, label: &str, default: Option<bool>) -> Result<bool, PromptError> {
        if !self.interactive {
            return Ok(default.unwrap_or(false));
        }

        let suffix = match default {
            Some(true) => "[Y/n]",
            Some(false) => "[y/N]",
            None => "[y/n]",
        };

        loop {
            write!(self.output, "{} {}: ", label, suffix)?;
            let answer = self.read_line()?.to_lowercase();
            match answer.as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                "" if default.is_some() => return Ok(default.unwrap_or(false)),
                _ => writeln!(self.output, "{}", style::error("Error: invalid input"))?,
            }
        }
    }

    pub fn error(&mut self, message: impl Display) -> Result<(), PromptError> {
        let text = format!("Error: {}", message);
        writeln!(self.output, "{}", style::error(&text))?;
        Ok(())
    }

    pub fn warn(&mut self, message: impl Display) -> Result<(), PromptError> {
        let text = format!("Warning: {}", message);
        writeln!(self.output, "{}", style::warning(&text))?;
        Ok(())
    }

    pub fn say(&mut self, message: impl Display) -> Result<(), PromptError> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }

    /// Read one trimmed line; end of input cancels the session.
    fn read_line(&mut self) -> Result<String, PromptError> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Err(PromptError::Cancelled);
        }
        Ok(line.trim().to_string())
    }
}
