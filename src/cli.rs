use crate::inspector::{Lookup, ProcessInspector};
use crate::run_config::{OutputMode, RunConfig, Target};
use crate::utils::errors::MonitoringError;
use clap::{ArgAction, ArgGroup, Parser};
use std::num::NonZeroU64;
use std::path::PathBuf;

const LIVE_DEFAULT_SECS: u64 = 60;
const EXPORT_DEFAULT_SECS: u64 = 5;

/// File descriptor watcher.
#[derive(Parser, Debug)]
#[command(name = "fd-watcher", about = "File descriptor watcher", version)]
#[command(group(ArgGroup::new("target").required(true).args(["pid", "name"])))]
pub struct Args {
    /// The pid of the process to monitor.
    #[arg(short, long)]
    pub pid: Option<u32>,

    /// The name of the process to monitor (exact match).
    #[arg(short, long)]
    pub name: Option<String>,

    /// The interval between two samples, in seconds.
    #[arg(short, long, default_value = "1")]
    pub interval: NonZeroU64,

    /// How long to watch, in seconds. Defaults to 60, or 5 with --stats.
    #[arg(short, long)]
    pub time: Option<u64>,

    /// Write the samples to fd_stats_<name>.csv instead of logging them.
    #[arg(short, long)]
    pub stats: bool,

    /// Directory receiving the --stats file.
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Increase logging verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors and live-mode sample lines. Without -q/-v, RUST_LOG
    /// applies and a level above info hides the sample lines.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    pub fn verbosity(&self) -> i8 {
        if self.quiet {
            -1
        } else {
            self.verbose.min(i8::MAX as u8) as i8
        }
    }

    /// Resolve the target through `inspector` and freeze the run settings.
    pub fn into_run_config<I: ProcessInspector>(
        self,
        inspector: &I,
    ) -> Result<RunConfig, MonitoringError> {
        let target = match (self.pid, self.name) {
            (Some(pid), _) => Target {
                pid,
                name: inspector
                    .resolve_name_by_pid(pid)
                    .found()
                    .unwrap_or_else(|| pid.to_string()),
            },
            (None, Some(name)) => match inspector.resolve_pid_by_name(&name) {
                Lookup::Found(pid) => Target { pid, name },
                Lookup::NotFound => {
                    return Err(MonitoringError::TargetNotFound {
                        target: format!("name '{}'", name),
                    });
                }
                Lookup::Failed(reason) => return Err(MonitoringError::ProcessDiscoveryError(reason)),
            },
            (None, None) => {
                return Err(MonitoringError::Other("a pid or a name is required".to_string()));
            }
        };

        let (mode, default_duration) = if self.stats {
            let mode = OutputMode::Export {
                destination: target.name.clone(),
                dir: self.output_dir,
            };
            (mode, EXPORT_DEFAULT_SECS)
        } else {
            (OutputMode::Live, LIVE_DEFAULT_SECS)
        };

        Ok(RunConfig::new(
            target,
            self.interval,
            self.time.unwrap_or(default_duration),
            mode,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspector::mock::ScriptedInspector;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("fd-watcher").chain(args.iter().copied()))
    }

    fn inspector() -> ScriptedInspector {
        ScriptedInspector::empty()
            .with_process(100, "alpha")
            .with_process(200, "beta")
    }

    #[test]
    fn test_defaults_for_live_mode() {
        let config = parse(&["--pid", "100"])
            .unwrap()
            .into_run_config(&inspector())
            .unwrap();
        assert_eq!(config.target, Target { pid: 100, name: "alpha".to_string() });
        assert_eq!(config.interval_secs(), 1);
        assert_eq!(config.duration, LIVE_DEFAULT_SECS);
        assert_eq!(config.mode, OutputMode::Live);
    }

    #[test]
    fn test_name_resolves_pid_for_export() {
        let config = parse(&["-n", "beta", "-s", "-i", "2", "-t", "30", "-o", "/tmp/out"])
            .unwrap()
            .into_run_config(&inspector())
            .unwrap();
        assert_eq!(config.target.pid, 200);
        assert_eq!(config.interval_secs(), 2);
        assert_eq!(config.duration, 30);
        assert_eq!(
            config.mode,
            OutputMode::Export {
                destination: "beta".to_string(),
                dir: PathBuf::from("/tmp/out"),
            }
        );
    }

    #[test]
    fn test_export_default_duration() {
        let config = parse(&["-n", "alpha", "--stats"])
            .unwrap()
            .into_run_config(&inspector())
            .unwrap();
        assert_eq!(config.duration, EXPORT_DEFAULT_SECS);
    }

    #[test]
    fn test_unknown_name_is_target_not_found() {
        let err = parse(&["-n", "gamma"])
            .unwrap()
            .into_run_config(&inspector())
            .unwrap_err();
        assert!(matches!(err, MonitoringError::TargetNotFound { .. }));
    }

    #[test]
    fn test_unnamed_pid_falls_back_to_number() {
        let config = parse(&["-p", "555", "-s"])
            .unwrap()
            .into_run_config(&inspector())
            .unwrap();
        assert_eq!(config.target.name, "555");
    }

    #[test]
    fn test_rejects_invalid_numbers() {
        assert!(parse(&["-p", "100", "-i", "0"]).is_err());
        assert!(parse(&["-p", "100", "-i", "abc"]).is_err());
        assert!(parse(&["-p", "100", "-t", "-5"]).is_err());
        assert!(parse(&["-p", "-1"]).is_err());
    }

    #[test]
    fn test_requires_exactly_one_target() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["-p", "100", "-n", "alpha"]).is_err());
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(parse(&["-p", "1"]).unwrap().verbosity(), 0);
        assert_eq!(parse(&["-p", "1", "-vv"]).unwrap().verbosity(), 2);
        assert_eq!(parse(&["-p", "1", "-q"]).unwrap().verbosity(), -1);
        assert!(parse(&["-p", "1", "-q", "-v"]).is_err());
    }
}
