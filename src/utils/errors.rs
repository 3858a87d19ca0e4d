use crate::series::Series;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitoringError {
    #[error("No process matching {target}")]
    TargetNotFound { target: String },
    #[error("Process {pid} exited after {collected} of {planned} samples")]
    TargetLostMidRun {
        pid: u32,
        collected: usize,
        planned: usize,
        /// Samples taken before the process went away; never written out
        partial: Series,
    },
    #[error("Failed to write {}: {source}", path.display())]
    SinkUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Process discovery error: {0}")]
    ProcessDiscoveryError(String),
    #[error("Other error: {0}")]
    Other(String),
}

impl MonitoringError {
    pub fn sink(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MonitoringError::SinkUnavailable {
            path: path.into(),
            source,
        }
    }
}
