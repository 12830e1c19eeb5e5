//! Multi-context workload driver
//!
//! A `ContextWorker` owns one context's `Generator` and pulls descriptors
//! from it, optionally pacing them in real time, counting them, and handing
//! each one to a sink (the place a real harness would issue the I/O).
//!
//! `run_contexts` runs one worker per context on its own thread, all paced
//! against the same start instant, and merges their statistics.
//!
//! # Example
//!
//! ```
//! use spc1::worker::{run_contexts, RunOptions};
//! use spc1::WorkloadConfig;
//! use std::sync::Arc;
//!
//! let config = Arc::new(WorkloadConfig::new(200, 2, 45000, 45000, 10000)?);
//! let summary = run_contexts(config, &RunOptions::new(1000), None)?;
//!
//! assert_eq!(summary.stats.total_ops(), 2000);
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::config::WorkloadConfig;
use crate::generator::descriptor::IoDescriptor;
use crate::generator::Generator;
use crate::stats::ContextStats;
use crate::util::pacing::Pacer;
use crate::util::time::calculate_iops;
use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Callback receiving every descriptor with the id of its context
pub type DescriptorSink = Arc<dyn Fn(u32, &IoDescriptor) + Send + Sync>;

/// How long and how each context runs
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Descriptors per context
    pub count: u64,
    /// Sleep until each descriptor is due
    pub pace: bool,
    /// Set to stop all contexts early
    pub stop_flag: Arc<AtomicBool>,
}

impl RunOptions {
    /// Unpaced run of `count` descriptors per context
    pub fn new(count: u64) -> Self {
        Self {
            count,
            pace: false,
            stop_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Enable or disable real-time pacing
    pub fn paced(mut self, pace: bool) -> Self {
        self.pace = pace;
        self
    }
}

/// Result of one context's run
#[derive(Debug, Clone)]
pub struct ContextSummary {
    pub context_id: u32,
    pub ops: u64,
    /// Scheduled time of the last descriptor
    pub virtual_span: Duration,
    /// Wall-clock time the context ran
    pub elapsed: Duration,
}

impl ContextSummary {
    /// Rate implied by the generated schedule
    pub fn virtual_iops(&self) -> f64 {
        calculate_iops(self.ops, self.virtual_span)
    }
}

/// Result of a multi-context run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Target aggregate rate of the configuration
    pub target_iops: f64,
    /// Whether descriptors were paced in real time
    pub paced: bool,
    /// Wall-clock duration of the whole run
    pub elapsed: Duration,
    /// Merged statistics of all contexts
    pub stats: ContextStats,
    /// Per-context results, ordered by context id
    pub contexts: Vec<ContextSummary>,
}

impl RunSummary {
    /// Aggregate rate implied by the generated schedules
    pub fn virtual_iops(&self) -> f64 {
        self.contexts.iter().map(|c| c.virtual_iops()).sum()
    }

    /// Aggregate rate achieved against the wall clock
    pub fn wall_iops(&self) -> f64 {
        calculate_iops(self.stats.total_ops(), self.elapsed)
    }

    /// Wall-clock rate for paced runs, schedule rate otherwise
    pub fn achieved_iops(&self) -> f64 {
        if self.paced {
            self.wall_iops()
        } else {
            self.virtual_iops()
        }
    }
}

/// Raises the run's stop flag unless disarmed, so a failed or panicking
/// context ends the others early
struct StopOnFailure<'a> {
    flag: &'a AtomicBool,
    armed: bool,
}

impl<'a> StopOnFailure<'a> {
    fn new(flag: &'a AtomicBool) -> Self {
        Self { flag, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for StopOnFailure<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.flag.store(true, Ordering::Relaxed);
        }
    }
}

/// Driver for a single context
pub struct ContextWorker {
    generator: Generator,
    stats: ContextStats,
}

impl ContextWorker {
    /// Wrap a context's generator
    pub fn new(generator: Generator) -> Self {
        Self {
            generator,
            stats: ContextStats::new(),
        }
    }

    /// Context this worker drives
    pub fn context_id(&self) -> u32 {
        self.generator.context_id()
    }

    /// Statistics so far
    pub fn stats(&self) -> &ContextStats {
        &self.stats
    }

    /// Generate up to `count` descriptors
    ///
    /// With a pacer, sleeps until each descriptor is due and records the
    /// dispatch lateness. Stops early when `stop_flag` is set. Returns the
    /// number of descriptors produced.
    pub fn run(
        &mut self,
        count: u64,
        pacer: Option<&Pacer>,
        stop_flag: &AtomicBool,
        sink: Option<&DescriptorSink>,
    ) -> Result<u64> {
        let context_id = self.context_id();
        let mut produced = 0;

        while produced < count && !stop_flag.load(Ordering::Relaxed) {
            let io = self
                .generator
                .generate()
                .with_context(|| format!("Context {} failed to generate descriptor", context_id))?;

            if let Some(pacer) = pacer {
                let late = pacer.wait(io.when);
                self.stats.record_lateness(late);
            }

            if let Some(sink) = sink {
                sink(context_id, &io);
            }

            self.stats.record(&io);
            produced += 1;
        }

        Ok(produced)
    }

    /// Consume the worker and return its statistics
    pub fn into_stats(self) -> ContextStats {
        self.stats
    }
}

/// Run every context of `config` on its own thread
///
/// Context ids are `0..context_count`. Paced runs share one start instant so
/// the aggregate schedule lines up across contexts.
///
/// # Errors
///
/// Returns the first generation error, or an error if a context thread
/// panicked. Either failure sets `options.stop_flag` so the remaining
/// contexts stop early.
pub fn run_contexts(
    config: Arc<WorkloadConfig>,
    options: &RunOptions,
    sink: Option<DescriptorSink>,
) -> Result<RunSummary> {
    let contexts = config.context_count();
    info!(
        bsus = config.bsu_count(),
        contexts,
        target_iops = config.target_iops(),
        count = options.count,
        paced = options.pace,
        "Starting workload generation"
    );

    let start = Instant::now();
    let pacer = options.pace.then(|| Pacer::with_start(start));

    let mut handles = Vec::with_capacity(contexts as usize);
    for context_id in 0..contexts {
        let generator = Generator::new(config.clone(), context_id);
        let stop_flag = options.stop_flag.clone();
        let sink = sink.clone();
        let count = options.count;

        let handle = std::thread::Builder::new()
            .name(format!("spc1-context-{}", context_id))
            .spawn(move || -> Result<(ContextSummary, ContextStats)> {
                debug!(context_id, "Context started");
                let guard = StopOnFailure::new(&stop_flag);
                let mut worker = ContextWorker::new(generator);
                let ops = worker.run(count, pacer.as_ref(), &stop_flag, sink.as_ref())?;
                guard.disarm();

                let stats = worker.into_stats();
                let summary = ContextSummary {
                    context_id,
                    ops,
                    virtual_span: stats.last_when(),
                    elapsed: start.elapsed(),
                };
                debug!(
                    context_id,
                    ops,
                    virtual_iops = summary.virtual_iops(),
                    "Context finished"
                );
                Ok((summary, stats))
            })
            .with_context(|| format!("Failed to spawn thread for context {}", context_id))?;

        handles.push(handle);
    }

    // Wait for all contexts before reporting the first failure
    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| {
            handle
                .join()
                .map_err(|_| anyhow::anyhow!("Context thread panicked"))
        })
        .collect();

    let mut stats = ContextStats::new();
    let mut summaries = Vec::with_capacity(results.len());
    for result in results {
        let (summary, context_stats) = result??;
        stats.merge(&context_stats)?;
        summaries.push(summary);
    }

    let summary = RunSummary {
        target_iops: config.target_iops(),
        paced: options.pace,
        elapsed: start.elapsed(),
        stats,
        contexts: summaries,
    };
    info!(
        ops = summary.stats.total_ops(),
        achieved_iops = summary.achieved_iops(),
        elapsed_secs = summary.elapsed.as_secs_f64(),
        "Workload generation complete"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::workload::Asu;
    use std::sync::atomic::AtomicU64;

    #[test]
    fn test_worker_counts() {
        let config = Arc::new(WorkloadConfig::new(50, 1, 4500, 4500, 1000).unwrap());
        let mut worker = ContextWorker::new(Generator::new(config, 0));
        let stop = AtomicBool::new(false);

        let produced = worker.run(500, None, &stop, None).unwrap();
        assert_eq!(produced, 500);
        assert_eq!(worker.stats().total_ops(), 500);
        assert!(worker.stats().lateness().is_empty());
    }

    #[test]
    fn test_worker_stop_flag() {
        let config = Arc::new(WorkloadConfig::new(50, 1, 4500, 4500, 1000).unwrap());
        let mut worker = ContextWorker::new(Generator::new(config, 0));
        let stop = AtomicBool::new(true);

        assert_eq!(worker.run(500, None, &stop, None).unwrap(), 0);
    }

    #[test]
    fn test_worker_sink_sees_every_descriptor() {
        let config = Arc::new(WorkloadConfig::new(50, 1, 4500, 4500, 1000).unwrap());
        let mut worker = ContextWorker::new(Generator::new(config, 3));
        let stop = AtomicBool::new(false);

        let seen = Arc::new(AtomicU64::new(0));
        let counter = seen.clone();
        let sink: DescriptorSink = Arc::new(move |context_id: u32, io: &IoDescriptor| {
            assert_eq!(context_id, 3);
            assert!(io.blocks >= 1);
            counter.fetch_add(1, Ordering::Relaxed);
        });

        worker.run(100, None, &stop, Some(&sink)).unwrap();
        assert_eq!(seen.load(Ordering::Relaxed), 100);
    }

    #[test]
    fn test_worker_paced_short_run() {
        // 10 descriptors at 5000 IOPS take about 2ms
        let config = Arc::new(WorkloadConfig::new(100, 1, 4500, 4500, 1000).unwrap());
        let mut worker = ContextWorker::new(Generator::new(config, 0));
        let stop = AtomicBool::new(false);
        let pacer = Pacer::start();

        worker.run(10, Some(&pacer), &stop, None).unwrap();
        assert_eq!(worker.stats().lateness().len(), 10);
        assert!(pacer.elapsed() >= worker.stats().last_when());
    }

    #[test]
    fn test_run_contexts_merges() {
        let config = Arc::new(WorkloadConfig::new(200, 4, 45000, 45000, 10000).unwrap());
        let summary = run_contexts(config, &RunOptions::new(2_000), None).unwrap();

        assert_eq!(summary.contexts.len(), 4);
        assert_eq!(summary.stats.total_ops(), 8_000);
        let ids: Vec<u32> = summary.contexts.iter().map(|c| c.context_id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert!(summary.stats.asu(Asu::Asu1).ops() > 0);
        assert!(!summary.paced);
    }

    #[test]
    fn test_failed_context_stops_the_others() {
        let config = Arc::new(WorkloadConfig::new(200, 2, 45000, 45000, 10000).unwrap());
        let sink: DescriptorSink = Arc::new(|context_id: u32, io: &IoDescriptor| {
            if context_id == 0 && io.when > Duration::from_millis(1) {
                panic!("sink failure");
            }
        });

        // Without the stop flag context 1 would never finish
        let options = RunOptions::new(u64::MAX);
        let err = run_contexts(config, &options, Some(sink)).unwrap_err();
        assert!(err.to_string().contains("panicked"), "{}", err);
        assert!(options.stop_flag.load(Ordering::Relaxed));
    }

    #[test]
    fn test_stop_guard_disarmed_on_success() {
        let flag = AtomicBool::new(false);
        StopOnFailure::new(&flag).disarm();
        assert!(!flag.load(Ordering::Relaxed));

        drop(StopOnFailure::new(&flag));
        assert!(flag.load(Ordering::Relaxed));
    }

    #[test]
    fn test_run_contexts_virtual_rate() {
        let config = Arc::new(WorkloadConfig::new(200, 2, 45000, 45000, 10000).unwrap());
        let summary = run_contexts(config, &RunOptions::new(50_000), None).unwrap();

        let iops = summary.achieved_iops();
        assert!(iops > 9_700.0 && iops < 10_300.0, "aggregate virtual IOPS {}", iops);
    }
}
