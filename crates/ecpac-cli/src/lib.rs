//! Command-line interface for ecpac: arguments, prompts and the
//! interactive session that assembles a job request.

pub mod args;
pub mod call;
pub mod prompt;
pub mod report;
pub mod session;
pub mod settings;
pub mod style;

pub use args::Args;
pub use call::{parse_ecpac_call, render_ecpac_call, CallError};
pub use prompt::{PromptError, Prompter};
pub use session::{confirm_location, Session, SessionError};
pub use settings::Settings;
