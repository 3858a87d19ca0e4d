use std::num::NonZeroU64;
use std::path::PathBuf;

/// The process a run watches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub pid: u32,
    /// Human-readable label; the pid itself when no name could be resolved
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Print each sample as it is taken.
    Live,
    /// Write the whole series once the run completes.
    Export { destination: String, dir: PathBuf },
}

impl OutputMode {
    pub fn is_live(&self) -> bool {
        matches!(self, OutputMode::Live)
    }
}

/// Settings of a single monitoring run, fixed before it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub target: Target,
    pub interval: NonZeroU64,
    pub duration: u64,
    pub mode: OutputMode,
}

impl RunConfig {
    pub fn new(target: Target, interval: NonZeroU64, duration: u64, mode: OutputMode) -> Self {
        Self {
            target,
            interval,
            duration,
            mode,
        }
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval.get()
    }
}
