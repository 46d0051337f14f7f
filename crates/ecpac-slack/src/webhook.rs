//! Slack incoming webhook.

use crate::message::Message;
use ecpac_parsers::{run_command, CommandError};
use serde::Serialize;
use thiserror::Error;
use tokio::process::Command;

/// Environment variable holding the webhook URL.
pub const ENV_WEBHOOK_URL: &str = "SLACK_WEBHOOK_URL";

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Message can not be quoted for the shell: {0}")]
    Quote(String),
    #[error("Webhook request failed: {0}")]
    Command(#[from] CommandError),
}

#[derive(Serialize)]
struct Payload<'a> {
    text: &'a str,
}

/// A configured Slack incoming webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlackWebhook {
    url: String,
}

impl SlackWebhook {
    /// Webhook for a URL; None when the URL is missing or blank.
    pub fn new(url: Option<&str>) -> Option<Self> {
        url.map(str::trim)
            .filter(|url| !url.is_empty())
            .map(|url| Self {
                url: url.to_string(),
            })
    }

    /// Webhook configured through `SLACK_WEBHOOK_URL`.
    pub fn from_env() -> Option<Self> {
        Self::new(std::env::var(ENV_WEBHOOK_URL).ok().as_deref())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// JSON body Slack expects for a `mrkdwn` text message.
    pub fn payload(message: &Message) -> Result<String, NotifyError> {
        Ok(serde_json::to_string(&Payload {
            text: &message.render(),
        })?)
    }

    /// curl arguments posting the message.
    pub fn curl_args(&self, message: &Message) -> Result<Vec<String>, NotifyError> {
        Ok(vec![
            "curl".to_string(),
            "-X".to_string(),
            "POST".to_string(),
            "-H".to_string(),
            "Content-type: application/json".to_string(),
            "--data".to_string(),
            Self::payload(message)?,
            self.url.clone(),
        ])
    }

    /// Shell command posting the message, for embedding in job scripts.
    pub fn bash_command(&self, message: &Message) -> Result<String, NotifyError> {
        let args = self.curl_args(message)?;
        shlex::try_join(args.iter().map(String::as_str))
            .map_err(|e| NotifyError::Quote(e.to_string()))
    }

    /// Post the message now.
    pub async fn post(&self, message: &Message) -> Result<(), NotifyError> {
        let args = self.curl_args(message)?;
        let mut cmd = Command::new(&args[0]);
        cmd.args(&args[1..]).arg("--silent").arg("--fail");
        run_command(&mut cmd, "curl").await?;
        tracing::debug!("posted slack notification");
        Ok(())
    }
}
