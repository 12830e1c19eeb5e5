//! Dispatch lateness histogram using HdrHistogram
//!
//! When descriptors are paced in real time, each one is dispatched some time
//! after its scheduled `when`. This histogram tracks that lateness from 1ns
//! to 1 hour with 3 significant digits.
//!
//! # Example
//!
//! ```
//! use spc1::stats::histogram::LatencyHistogram;
//! use std::time::Duration;
//!
//! let mut hist = LatencyHistogram::new();
//! hist.record(Duration::from_micros(100));
//! hist.record(Duration::from_micros(300));
//!
//! assert_eq!(hist.len(), 2);
//! assert!(hist.percentile(99.0).is_some());
//! ```

use hdrhistogram::Histogram;
use std::time::Duration;

const MAX_NANOS: u64 = 3_600_000_000_000;

/// Lateness histogram wrapper
#[derive(Debug, Clone)]
pub struct LatencyHistogram {
    histogram: Histogram<u64>,
}

impl LatencyHistogram {
    /// Create an empty histogram tracking 1ns to 1 hour
    pub fn new() -> Self {
        // Bounds are constants that hdrhistogram accepts
        let histogram = Histogram::new_with_bounds(1, MAX_NANOS, 3)
            .expect("Failed to create histogram with valid bounds");

        Self { histogram }
    }

    /// Record a sample, clamped to the tracked range
    #[inline]
    pub fn record(&mut self, latency: Duration) {
        let nanos = u64::try_from(latency.as_nanos()).unwrap_or(MAX_NANOS);
        let value = nanos.clamp(1, MAX_NANOS);
        let _ = self.histogram.record(value);
    }

    /// Value at a percentile (0.0 - 100.0), or None if empty
    pub fn percentile(&self, percentile: f64) -> Option<Duration> {
        if self.is_empty() {
            return None;
        }
        Some(Duration::from_nanos(self.histogram.value_at_percentile(percentile)))
    }

    /// Largest recorded sample
    pub fn max(&self) -> Option<Duration> {
        if self.is_empty() {
            return None;
        }
        Some(Duration::from_nanos(self.histogram.max()))
    }

    /// Mean of recorded samples
    pub fn mean(&self) -> Option<Duration> {
        if self.is_empty() {
            return None;
        }
        Some(Duration::from_nanos(self.histogram.mean() as u64))
    }

    /// Number of samples recorded
    pub fn len(&self) -> u64 {
        self.histogram.len()
    }

    /// True if no samples have been recorded
    pub fn is_empty(&self) -> bool {
        self.histogram.len() == 0
    }

    /// Merge another histogram into this one
    ///
    /// # Errors
    ///
    /// Returns an error if the histograms have incompatible bounds.
    pub fn merge(&mut self, other: &LatencyHistogram) -> anyhow::Result<()> {
        self.histogram
            .add(&other.histogram)
            .map_err(|e| anyhow::anyhow!("Failed to merge histograms: {}", e))?;
        Ok(())
    }
}

impl Default for LatencyHistogram {
    fn default() -> Self {
        Self::new()
    }
}
