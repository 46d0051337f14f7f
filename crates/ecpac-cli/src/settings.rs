//! Environment-derived defaults.

use crate::args::Args;
use camino::{Utf8Path, Utf8PathBuf};
use ecpac_slack::SlackWebhook;

/// Environment variable pointing at the user's PSC project directory
/// (`/ocean/projects/<group>/<user>`).
pub const ENV_PROJECT: &str = "PROJECT";

/// Defaults that depend on where ecpac runs.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// `$PROJECT`, when set
    pub project_dir: Option<Utf8PathBuf>,
    pub webhook: Option<SlackWebhook>,
}

impl Settings {
    pub fn new(project_dir: Option<Utf8PathBuf>, webhook: Option<SlackWebhook>) -> Self {
        Self {
            project_dir,
            webhook,
        }
    }

    /// Read `$PROJECT`; the webhook comes from `--slack-webhook` or `SLACK_WEBHOOK_URL`.
    pub fn from_env(args: &Args) -> Self {
        let project_dir = std::env::var(ENV_PROJECT)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(Utf8PathBuf::from);
        Self::new(project_dir, SlackWebhook::new(args.slack_webhook.as_deref()))
    }

    fn project(&self) -> &Utf8Path {
        self.project_dir.as_deref().unwrap_or(Utf8Path::new(""))
    }

    /// Whether the PSC project directory exists, i.e. we run on Bridges-2.
    pub fn on_psc(&self) -> bool {
        self.project_dir.as_deref().is_some_and(|p| p.is_dir())
    }

    pub fn default_output(&self) -> Utf8PathBuf {
        self.project().join("ecpac_runs")
    }

    pub fn default_image(&self) -> Utf8PathBuf {
        self.project().join("images/cpac.sif")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_under_project() {
        let settings = Settings::new(Some("/ocean/projects/med000000p/me".into()), None);
        assert_eq!(
            settings.default_output(),
            "/ocean/projects/med000000p/me/ecpac_runs"
        );
        assert_eq!(
            settings.default_image(),
            "/ocean/projects/med000000p/me/images/cpac.sif"
        );
    }

    #[test]
    fn test_defaults_without_project_are_relative() {
        let settings = Settings::default();
        assert_eq!(settings.default_output(), "ecpac_runs");
        assert_eq!(settings.default_image(), "images/cpac.sif");
        assert!(!settings.on_psc());
    }
}
