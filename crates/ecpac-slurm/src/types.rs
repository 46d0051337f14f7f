//! SLURM job types.

use crate::script::quote;
use camino::Utf8PathBuf;
use ecpac_parsers::{access_gb_to_mb, format_hms};
use std::time::Duration;

/// Partition used for shared-node jobs on Bridges-2.
pub const DEFAULT_PARTITION: &str = "RM-shared";

/// `#SBATCH` directives of a single job.
#[derive(Debug, Clone, PartialEq)]
pub struct SbatchHeader {
    /// Job name
    pub job_name: String,

    /// File receiving stdout and stderr
    pub output: Utf8PathBuf,

    /// Number of nodes
    pub nodes: u32,

    /// Partition
    pub partition: String,

    /// Time limit
    pub time: Duration,

    /// Tasks (cores) per node
    pub ntasks_per_node: u32,

    /// Memory in GB, converted with ACCESS's 1000 MB per GB
    pub memory_gb: f64,
}

impl SbatchHeader {
    /// Header for a single-node shared job.
    pub fn shared(
        job_name: impl Into<String>,
        output: Utf8PathBuf,
        time: Duration,
        threads: u32,
        memory_gb: f64,
    ) -> Self {
        Self {
            job_name: job_name.into(),
            output,
            nodes: 1,
            partition: DEFAULT_PARTITION.to_string(),
            time,
            ntasks_per_node: threads,
            memory_gb,
        }
    }

    /// Directive lines in the order sbatch reads them.
    ///
    /// Job name and output are shell-quoted; sbatch splits directive
    /// values on whitespace otherwise.
    pub fn lines(&self) -> Vec<String> {
        [
            ("job-name", quote(&self.job_name)),
            ("output", quote(self.output.as_str())),
            ("nodes", self.nodes.to_string()),
            ("partition", self.partition.clone()),
            ("time", format_hms(self.time)),
            ("ntasks-per-node", self.ntasks_per_node.to_string()),
            ("mem", access_gb_to_mb(self.memory_gb).to_string()),
        ]
        .into_iter()
        .map(|(key, value)| format!("#SBATCH --{} {}", key, value))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lines() {
        let header = SbatchHeader::shared(
            "run_default_sub-01",
            "/runs/out.log".into(),
            Duration::from_secs(48 * 3600),
            8,
            16.0,
        );
        assert_eq!(
            header.lines(),
            vec![
                "#SBATCH --job-name run_default_sub-01",
                "#SBATCH --output /runs/out.log",
                "#SBATCH --nodes 1",
                "#SBATCH --partition RM-shared",
                "#SBATCH --time 48:00:00",
                "#SBATCH --ntasks-per-node 8",
                "#SBATCH --mem 16000",
            ]
        );
    }

    #[test]
    fn test_header_quotes_values_with_spaces() {
        let header = SbatchHeader::shared(
            "run 24_default_sub-01",
            "/tmp/my runs/run 24/default/sub-01/out.log".into(),
            Duration::from_secs(3600),
            4,
            8.0,
        );
        let values: Vec<Vec<String>> = header
            .lines()
            .iter()
            .map(|line| shlex::split(line.trim_start_matches("#SBATCH ")).unwrap())
            .collect();
        assert_eq!(values[0], vec!["--job-name", "run 24_default_sub-01"]);
        assert_eq!(
            values[1],
            vec!["--output", "/tmp/my runs/run 24/default/sub-01/out.log"]
        );
        assert_eq!(values[4], vec!["--time", "01:00:00"]);
    }
}
