//! CLI argument parsing for ecpac.

use camino::Utf8PathBuf;
use clap::Parser;

/// Every option left out is asked for interactively.
///
/// Numbers are kept as text so an invalid value can be corrected at the
/// prompt instead of aborting the session.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "ecpac")]
#[command(about = "Assemble and submit C-PAC jobs on SLURM")]
pub struct Args {
    /// Input directory (contains subject folders)
    #[arg(short = 'i', long = "input")]
    pub input: Option<Utf8PathBuf>,

    /// Output directory (contains runs)
    #[arg(short = 'o', long = "output")]
    pub output: Option<Utf8PathBuf>,

    /// Run name
    #[arg(short = 'r', long = "run")]
    pub run: Option<String>,

    /// Singularity image file (.sif)
    #[arg(short = 'g', long = "image")]
    pub image: Option<Utf8PathBuf>,

    /// List of subjects, separated by whitespace
    #[arg(short = 's', long = "subject")]
    pub subject: Option<String>,

    /// List of pipeline presets or config files, separated by whitespace
    #[arg(short = 'p', long = "pipeline")]
    pub pipeline: Option<String>,

    /// Analysis level ("participant", "group", "test_config")
    #[arg(short = 'a', long = "analysis_level")]
    pub analysis_level: Option<String>,

    /// C-PAC folder for patching the image
    #[arg(short = 'c', long = "cpac")]
    pub cpac: Option<Utf8PathBuf>,

    /// Memory (GB) for each job
    #[arg(short = 'm', long = "memory_gb")]
    pub memory_gb: Option<String>,

    /// Number of threads/cores for each job
    #[arg(short = 't', long = "threads")]
    pub threads: Option<String>,

    /// Maximum job runtime (in hours)
    #[arg(short = 'd', long = "duration_h")]
    pub duration_h: Option<String>,

    /// Save the C-PAC working directory (true/yes/y/1)
    #[arg(
        short = 'w',
        long = "save_working_dir",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub save_working_dir: Option<String>,

    /// Additional arguments passed to C-PAC
    #[arg(short = 'x', long = "extra_cpac_args", allow_hyphen_values = true)]
    pub extra_cpac_args: Option<String>,

    /// Never prompt: use defaults for missing options and fail on invalid ones
    #[arg(long)]
    pub no_input: bool,

    /// Create the run files without asking
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Submit the jobs without asking
    #[arg(long)]
    pub launch: bool,

    /// Print the first C-PAC command and exit without writing anything
    #[arg(long)]
    pub print: bool,

    /// Log debug output to stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Slack incoming webhook for job notifications
    #[arg(long, env = "SLACK_WEBHOOK_URL", hide_env_values = true)]
    pub slack_webhook: Option<String>,
}
