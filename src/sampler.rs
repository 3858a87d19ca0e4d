use crate::inspector::{Lookup, ProcessInspector};
use crate::run_config::RunConfig;
use crate::series::{Sample, Series, SeriesAccumulator};
use chrono::Utc;
use log::{debug, info, warn};
use std::num::NonZeroU64;
use std::sync::Arc;
use tokio::time::Duration;

/// Upper bound on the up-front allocation; the series grows past it on demand
const MAX_PREALLOCATED_SAMPLES: usize = 4096;

/// Number of ticks planned for a run: `floor(duration / interval) + 1`.
pub fn slot_count(interval: NonZeroU64, duration: u64) -> usize {
    usize::try_from(duration / interval.get())
        .unwrap_or(usize::MAX)
        .saturating_add(1)
}

/// Scheduled stamp of `slot`: `start + slot * interval`, saturating at the
/// ends of the `i64` range.
pub fn slot_timestamp(start: i64, slot: usize, interval: u64) -> i64 {
    let slot = i64::try_from(slot).unwrap_or(i64::MAX);
    let interval = i64::try_from(interval).unwrap_or(i64::MAX);
    start.saturating_add(slot.saturating_mul(interval))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerState {
    Idle,
    Validating,
    Sampling,
    Completed,
    Aborted,
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Every planned slot was sampled.
    Completed,
    /// The process was not there when the run started.
    TargetNotFound,
    /// The process went away after `collected` samples.
    TargetLost { collected: usize },
}

/// Result of one sampler run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub pid: u32,
    pub planned: usize,
    pub state: SamplerState,
    pub termination: Termination,
    pub series: Series,
}

impl RunReport {
    pub fn is_complete(&self) -> bool {
        self.termination == Termination::Completed
    }
}

/// Takes one descriptor count per tick for a single process.
///
/// A sampler runs once: `run` consumes it and a new run needs a new sampler.
pub struct Sampler<I: ProcessInspector> {
    inspector: Arc<I>,
    pid: u32,
    interval: NonZeroU64,
    planned: usize,
    state: SamplerState,
    series: SeriesAccumulator,
}

impl<I: ProcessInspector> Sampler<I> {
    pub fn new(config: &RunConfig, inspector: Arc<I>) -> Self {
        let pid = config.target.pid;
        let planned = slot_count(config.interval, config.duration);
        let capacity = planned.min(MAX_PREALLOCATED_SAMPLES);

        Self {
            inspector,
            pid,
            interval: config.interval,
            planned,
            state: SamplerState::Idle,
            series: SeriesAccumulator::new(pid, capacity, config.mode.is_live()),
        }
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    pub fn planned(&self) -> usize {
        self.planned
    }

    fn transition(&mut self, next: SamplerState) {
        debug!("Sampler for pid {}: {:?} -> {:?}", self.pid, self.state, next);
        self.state = next;
    }

    fn finish(mut self, termination: Termination) -> RunReport {
        let state = match termination {
            Termination::Completed => SamplerState::Completed,
            Termination::TargetNotFound | Termination::TargetLost { .. } => SamplerState::Aborted,
        };
        self.transition(state);

        RunReport {
            pid: self.pid,
            planned: self.planned,
            state,
            termination,
            series: self.series.finalize(),
        }
    }

    /// Drive the run to a terminal state.
    ///
    /// Slot `i` is stamped `start + i * interval`; the wait between ticks is
    /// not corrected for the time spent measuring.
    pub async fn run(mut self) -> RunReport {
        self.transition(SamplerState::Validating);
        if !self.inspector.exists(self.pid).await {
            debug!("No process with pid [{}]", self.pid);
            return self.finish(Termination::TargetNotFound);
        }

        self.transition(SamplerState::Sampling);
        let interval = self.interval.get();
        let pause = Duration::from_secs(interval);
        let start = Utc::now().timestamp();

        for slot in 0..self.planned {
            let count = match self.inspector.count_descriptors(self.pid).await {
                Lookup::Found(count) => count,
                Lookup::NotFound => {
                    info!("Process {} exited after {} samples", self.pid, self.series.len());
                    let collected = self.series.len();
                    return self.finish(Termination::TargetLost { collected });
                }
                Lookup::Failed(reason) => {
                    warn!("Lost access to descriptors of process {}: {}", self.pid, reason);
                    let collected = self.series.len();
                    return self.finish(Termination::TargetLost { collected });
                }
            };

            self.series
                .append(Sample::new(slot_timestamp(start, slot, interval), count));

            if slot + 1 < self.planned {
                tokio::time::sleep(pause).await;
            }
        }

        self.finish(Termination::Completed)
    }
}
