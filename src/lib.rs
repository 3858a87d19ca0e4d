//! Samples the open file-descriptor count of a running process, either
//! logging each sample as it is taken or exporting the whole series to CSV.

pub mod utils {
    pub mod errors;
    pub mod logger;
    pub mod psutils;
}

pub mod cli;
pub mod exporter;
pub mod inspector;
pub mod run_config;
pub mod sampler;
pub mod series;
pub mod watcher;
