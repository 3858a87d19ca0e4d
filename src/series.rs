use crate::utils::errors::MonitoringError;
use chrono::{DateTime, Utc};
use itertools::multiunzip;
use log::info;
use polars::prelude::*;
use std::fmt;

/// Log target of live-mode sample lines, kept visible even with `--quiet`
pub const SAMPLE_LOG_TARGET: &str = "fd_watcher::samples";

/// One point-in-time measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// Seconds since the Unix epoch
    pub timestamp: i64,
    pub count: usize,
}

impl Sample {
    pub fn new(timestamp: i64, count: usize) -> Self {
        Self { timestamp, count }
    }

    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

/// Chronologically ordered samples of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Series {
    samples: Vec<Sample>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// DataFrame view: timestamp | count
    pub fn to_frame(&self) -> Result<DataFrame, MonitoringError> {
        let (timestamps, counts): (Vec<i64>, Vec<u64>) = multiunzip(
            self.samples
                .iter()
                .map(|sample| (sample.timestamp, sample.count as u64)),
        );

        df![
            "timestamp" => timestamps,
            "count" => counts,
        ]
        .map_err(|e| MonitoringError::Other(format!("Failed to create series DataFrame: {}", e)))
    }

    /// Summary of the descriptor counts, `None` for an empty series.
    pub fn stats(&self) -> Result<Option<SeriesStats>, MonitoringError> {
        let (first, last) = match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Ok(None),
        };

        let frame = self.to_frame()?;
        let counts = frame
            .column("count")
            .map_err(|e| MonitoringError::Other(format!("Failed to access count column: {}", e)))?
            .u64()
            .map_err(|e| MonitoringError::Other(format!("Count column is not u64 type: {}", e)))?;

        let (min, max, sum) = match (counts.min(), counts.max(), counts.sum()) {
            (Some(min), Some(max), Some(sum)) => (min, max, sum),
            _ => return Err(MonitoringError::Other("Count column holds no values".to_string())),
        };

        Ok(Some(SeriesStats {
            samples: frame.height(),
            min,
            max,
            mean: sum as f64 / frame.height() as f64,
            growth: last.count as i64 - first.count as i64,
            first,
            last,
        }))
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStats {
    pub samples: usize,
    pub min: u64,
    pub max: u64,
    pub mean: f64,
    /// Last count minus first count; a steady rise hints at a leak
    pub growth: i64,
    pub first: Sample,
    pub last: Sample,
}

impl SeriesStats {
    pub fn span_seconds(&self) -> i64 {
        self.last.timestamp - self.first.timestamp
    }
}

impl fmt::Display for SeriesStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} samples over {}s: min {}, max {}, mean {:.2}, growth {:+}",
            self.samples,
            self.span_seconds(),
            self.min,
            self.max,
            self.mean,
            self.growth
        )?;
        if let (Some(from), Some(to)) = (self.first.datetime(), self.last.datetime()) {
            write!(f, " ({} .. {})", from.to_rfc3339(), to.to_rfc3339())?;
        }
        Ok(())
    }
}

/// Collects the samples of one run, optionally echoing each one to the log.
pub struct SeriesAccumulator {
    pid: u32,
    samples: Vec<Sample>,
    echo: bool,
}

impl SeriesAccumulator {
    pub fn new(pid: u32, capacity: usize, echo: bool) -> Self {
        Self {
            pid,
            samples: Vec::with_capacity(capacity),
            echo,
        }
    }

    pub fn append(&mut self, sample: Sample) {
        if self.echo {
            info!(target: SAMPLE_LOG_TARGET, "process {}: {}", self.pid, sample.count);
        }
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn finalize(self) -> Series {
        Series {
            samples: self.samples,
        }
    }
}
