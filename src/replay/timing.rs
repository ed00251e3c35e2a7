//! Per-frame tracking latency statistics.

use std::fmt;
use std::time::Duration;

/// Time spent inside the engine for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameLatencySample {
    pub index: usize,
    pub duration: Duration,
}

impl FrameLatencySample {
    pub fn seconds(&self) -> f64 {
        self.duration.as_secs_f64()
    }
}

/// Summary over all recorded samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingSummary {
    pub count: usize,
    /// Element `count / 2` of the ascending order, i.e. the upper median
    /// when `count` is even.
    pub median: Duration,
    pub mean: Duration,
    pub min: Duration,
    pub max: Duration,
    pub total: Duration,
}

impl fmt::Display for TimingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "median tracking time: {}", self.median.as_secs_f64())?;
        write!(f, "mean tracking time: {}", self.mean.as_secs_f64())
    }
}

/// Append-only latency log, one sample per processed frame.
#[derive(Debug, Default, Clone)]
pub struct TimingAggregator {
    samples: Vec<FrameLatencySample>,
}

impl TimingAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
        }
    }

    pub fn record(&mut self, index: usize, duration: Duration) {
        self.samples.push(FrameLatencySample { index, duration });
    }

    /// Samples in processing order.
    pub fn samples(&self) -> &[FrameLatencySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Median and mean of the samples; `None` when nothing was recorded.
    pub fn summary(&self) -> Option<TimingSummary> {
        let mut sorted: Vec<Duration> = self.samples.iter().map(|s| s.duration).collect();
        sorted.sort_unstable();

        let count = sorted.len();
        let (&min, &max) = (sorted.first()?, sorted.last()?);
        let total: Duration = sorted.iter().sum();
        let mean = Duration::from_secs_f64(total.as_secs_f64() / count as f64);

        Some(TimingSummary {
            count,
            median: sorted[count / 2],
            mean,
            min,
            max,
            total,
        })
    }
}
