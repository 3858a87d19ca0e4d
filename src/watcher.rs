use crate::exporter::CsvExporter;
use crate::inspector::ProcessInspector;
use crate::run_config::{OutputMode, RunConfig};
use crate::sampler::{Sampler, Termination};
use crate::series::Series;
use crate::utils::errors::MonitoringError;
use log::{info, warn};
use std::sync::Arc;

/// Run one monitoring session and apply the output mode to its result.
///
/// Live runs succeed with whatever was sampled, even when the process exits
/// early. Export runs only write a file for a complete series; a truncated one
/// fails with `TargetLostMidRun`, carrying the partial series, and nothing is
/// written.
pub async fn watch<I: ProcessInspector>(
    config: RunConfig,
    inspector: Arc<I>,
) -> Result<Series, MonitoringError> {
    let pid = config.target.pid;
    let owner = inspector
        .resolve_owner(pid)
        .found()
        .unwrap_or_else(|| "unknown".to_string());
    info!(
        "Watching process {} ({}, user {}) every {}s for {}s",
        pid,
        config.target.name,
        owner,
        config.interval_secs(),
        config.duration
    );

    let report = Sampler::new(&config, inspector).run().await;

    match (report.termination, config.mode) {
        (Termination::TargetNotFound, _) => Err(MonitoringError::TargetNotFound {
            target: format!("pid [{}]", pid),
        }),
        (Termination::TargetLost { collected }, OutputMode::Export { .. }) => {
            Err(MonitoringError::TargetLostMidRun {
                pid,
                collected,
                planned: report.planned,
                partial: report.series,
            })
        }
        (Termination::TargetLost { .. }, OutputMode::Live) | (Termination::Completed, OutputMode::Live) => {
            info!("Finished watching process {} ({} samples)", pid, report.series.len());
            Ok(report.series)
        }
        (Termination::Completed, OutputMode::Export { destination, dir }) => {
            let path = CsvExporter::new(dir).export(&report.series, &destination)?;
            info!("Wrote {} samples to {}", report.series.len(), path.display());

            match report.series.stats() {
                Ok(Some(stats)) => info!("Descriptors of process {}: {}", pid, stats),
                Ok(None) => {}
                Err(e) => warn!("Could not summarise series: {}", e),
            }
            Ok(report.series)
        }
    }
}
