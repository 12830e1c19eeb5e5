//! Statistics over generated descriptor sequences
//!
//! `ContextStats` is owned by one context's worker thread and updated without
//! atomics; per-context stats are merged after the threads join.

pub mod histogram;

use crate::config::workload::{Asu, ASU_COUNT, BLOCK_SIZE, MAX_STREAMS_PER_ASU};
use crate::generator::descriptor::IoDescriptor;
use histogram::LatencyHistogram;
use std::time::Duration;

/// Counters for one ASU
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AsuCounters {
    pub reads: u64,
    pub writes: u64,
    pub read_blocks: u64,
    pub write_blocks: u64,
    /// Operations per stream
    pub streams: [u64; MAX_STREAMS_PER_ASU as usize],
}

impl AsuCounters {
    /// Reads plus writes
    pub fn ops(&self) -> u64 {
        self.reads + self.writes
    }

    /// Blocks transferred in either direction
    pub fn blocks(&self) -> u64 {
        self.read_blocks + self.write_blocks
    }

    /// Fraction of operations that were reads, None without operations
    pub fn read_fraction(&self) -> Option<f64> {
        match self.ops() {
            0 => None,
            ops => Some(self.reads as f64 / ops as f64),
        }
    }

    fn merge(&mut self, other: &AsuCounters) {
        self.reads += other.reads;
        self.writes += other.writes;
        self.read_blocks += other.read_blocks;
        self.write_blocks += other.write_blocks;
        for (mine, theirs) in self.streams.iter_mut().zip(other.streams.iter()) {
            *mine += theirs;
        }
    }
}

/// Statistics for one context (or the merge of several)
#[derive(Debug, Clone, Default)]
pub struct ContextStats {
    asus: [AsuCounters; ASU_COUNT],
    /// Largest `when` seen
    last_when: Duration,
    /// Dispatch lateness of paced descriptors
    lateness: LatencyHistogram,
}

impl ContextStats {
    /// Create empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one descriptor
    #[inline]
    pub fn record(&mut self, io: &IoDescriptor) {
        let counters = &mut self.asus[io.asu.index()];
        if io.is_read {
            counters.reads += 1;
            counters.read_blocks += u64::from(io.blocks);
        } else {
            counters.writes += 1;
            counters.write_blocks += u64::from(io.blocks);
        }
        if let Some(slot) = counters.streams.get_mut(io.stream as usize) {
            *slot += 1;
        }
        self.last_when = self.last_when.max(io.when);
    }

    /// Record how late a paced descriptor was dispatched
    #[inline]
    pub fn record_lateness(&mut self, lateness: Duration) {
        self.lateness.record(lateness);
    }

    /// Merge statistics from another context
    pub fn merge(&mut self, other: &ContextStats) -> anyhow::Result<()> {
        for (mine, theirs) in self.asus.iter_mut().zip(other.asus.iter()) {
            mine.merge(theirs);
        }
        self.last_when = self.last_when.max(other.last_when);
        self.lateness.merge(&other.lateness)
    }

    /// Counters for one ASU
    pub fn asu(&self, asu: Asu) -> &AsuCounters {
        &self.asus[asu.index()]
    }

    /// Total operations
    pub fn total_ops(&self) -> u64 {
        self.asus.iter().map(|a| a.ops()).sum()
    }

    /// Total reads
    pub fn read_ops(&self) -> u64 {
        self.asus.iter().map(|a| a.reads).sum()
    }

    /// Total writes
    pub fn write_ops(&self) -> u64 {
        self.asus.iter().map(|a| a.writes).sum()
    }

    /// Total bytes across all ASUs
    pub fn total_bytes(&self) -> u64 {
        self.asus.iter().map(|a| a.blocks()).sum::<u64>() * BLOCK_SIZE
    }

    /// Fraction of operations that targeted an ASU
    pub fn asu_fraction(&self, asu: Asu) -> Option<f64> {
        match self.total_ops() {
            0 => None,
            total => Some(self.asu(asu).ops() as f64 / total as f64),
        }
    }

    /// Largest scheduled time seen
    pub fn last_when(&self) -> Duration {
        self.last_when
    }

    /// Dispatch lateness histogram (empty for unpaced runs)
    pub fn lateness(&self) -> &LatencyHistogram {
        &self.lateness
    }
}
