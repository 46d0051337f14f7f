//! Slack notifications for ecpac.
//!
//! Messages are posted to an incoming webhook with `curl`, either from the
//! generated job scripts or directly by the CLI.

pub mod message;
pub mod webhook;

pub use message::Message;
pub use webhook::{NotifyError, SlackWebhook, ENV_WEBHOOK_URL};
