//! Requested resources and how they are split between SLURM and C-PAC.

use std::time::Duration;

/// Resources requested by the user for each job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resources {
    /// Threads/cores per job
    pub threads: u32,
    /// Memory per job in GB
    pub memory_gb: f64,
    /// Wall-clock limit per job
    pub duration: Duration,
}

impl Resources {
    pub const DEFAULT_THREADS: u32 = 8;
    pub const DEFAULT_DURATION_HOURS: u64 = 48;

    /// ACCESS allocates 2 GB per thread.
    pub const GB_PER_THREAD: f64 = 2.0;

    /// Memory suggested for a thread count.
    pub fn default_memory_gb(threads: u32) -> f64 {
        Self::GB_PER_THREAD * f64::from(threads)
    }

    /// Split the request into SLURM and C-PAC shares.
    ///
    /// One thread and 1 GB stay with the system. When more memory is
    /// requested than the thread count covers, the job asks for extra
    /// threads so that ACCESS grants the memory.
    pub fn split(&self) -> JobResources {
        let cpac_threads = self.threads.saturating_sub(1).max(1);
        let cpac_memory_gb = (self.memory_gb - 1.0).max(1.0);
        let memory_bound = self.memory_gb > Self::default_memory_gb(self.threads);

        let job_threads = if memory_bound {
            ((self.memory_gb / Self::GB_PER_THREAD).ceil() as u32).max(2)
        } else {
            self.threads
        };

        JobResources {
            job_threads,
            job_memory_gb: self.memory_gb,
            cpac_threads,
            cpac_memory_gb,
            memory_bound,
        }
    }
}

impl Default for Resources {
    fn default() -> Self {
        Self {
            threads: Self::DEFAULT_THREADS,
            memory_gb: Self::default_memory_gb(Self::DEFAULT_THREADS),
            duration: Duration::from_secs(Self::DEFAULT_DURATION_HOURS * 3600),
        }
    }
}

/// Concrete per-job resource numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JobResources {
    pub job_threads: u32,
    pub job_memory_gb: f64,
    pub cpac_threads: u32,
    pub cpac_memory_gb: f64,
    /// Job threads were raised to cover the requested memory
    pub memory_bound: bool,
}
