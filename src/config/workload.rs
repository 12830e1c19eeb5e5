//! Workload profile structures
//!
//! A profile carries the distribution constants the generator samples from:
//! per-ASU selection weight, read fraction, stream count and hot-region
//! locality, the transfer-size table, and the per-BSU arrival rate.
//!
//! The defaults fold the published SPC-1 stream intensities into one entry
//! per ASU. They can be overridden from a TOML run file.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Size of one addressing unit in bytes
pub const BLOCK_SIZE: u64 = 4096;

/// Number of Application Storage Units
pub const ASU_COUNT: usize = 3;

/// Upper bound on streams within one ASU
pub const MAX_STREAMS_PER_ASU: u32 = 8;

/// Application Storage Unit
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Asu {
    /// ASU1, data store
    Asu1,
    /// ASU2, user store
    Asu2,
    /// ASU3, log / sequential store
    Asu3,
}

impl Asu {
    /// All ASUs in numbering order
    pub const ALL: [Asu; ASU_COUNT] = [Asu::Asu1, Asu::Asu2, Asu::Asu3];

    /// One-based ASU number (1, 2 or 3)
    pub fn number(self) -> u32 {
        self.index() as u32 + 1
    }

    /// Zero-based index into per-ASU tables
    pub fn index(self) -> usize {
        match self {
            Asu::Asu1 => 0,
            Asu::Asu2 => 1,
            Asu::Asu3 => 2,
        }
    }

    /// ASU for a zero-based table index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for Asu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Access profile of one ASU
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsuProfile {
    /// Relative probability of choosing this ASU
    pub weight: f64,
    /// Probability that an I/O against this ASU is a read (0.0-1.0)
    pub read_fraction: f64,
    /// Number of independent streams (1-8)
    pub streams: u32,
    /// Probability that an access lands in the hot region (0.0-1.0)
    #[serde(default)]
    pub hot_access_fraction: f64,
    /// Size of the hot region as a fraction of the ASU (0.0-1.0]
    #[serde(default = "default_hot_region_fraction")]
    pub hot_region_fraction: f64,
}

fn default_hot_region_fraction() -> f64 {
    1.0
}

/// One entry of the transfer-size table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransferSize {
    /// Transfer length in 4 KiB blocks
    pub blocks: u32,
    /// Relative probability of this length
    pub weight: f64,
}

/// Complete set of distribution constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadProfile {
    /// Target I/O rate contributed by each BSU
    pub iops_per_bsu: f64,
    /// ASU1, ASU2, ASU3 in order
    pub asus: [AsuProfile; ASU_COUNT],
    /// Transfer lengths and their weights
    pub transfer_sizes: Vec<TransferSize>,
}

impl Default for WorkloadProfile {
    fn default() -> Self {
        Self {
            iops_per_bsu: 50.0,
            asus: [
                // Streams 1-4 of the published profile: 0.035 + 0.281 + 0.070 + 0.210
                AsuProfile {
                    weight: 0.596,
                    read_fraction: 0.5587,
                    streams: 4,
                    hot_access_fraction: 0.60,
                    hot_region_fraction: 0.15,
                },
                // Streams 5-7: 0.018 + 0.070 + 0.035
                AsuProfile {
                    weight: 0.123,
                    read_fraction: 0.4992,
                    streams: 3,
                    hot_access_fraction: 0.50,
                    hot_region_fraction: 0.15,
                },
                // Stream 8: write-only
                AsuProfile {
                    weight: 0.281,
                    read_fraction: 0.0,
                    streams: 1,
                    hot_access_fraction: 0.0,
                    hot_region_fraction: 1.0,
                },
            ],
            transfer_sizes: vec![
                TransferSize { blocks: 1, weight: 0.70 },
                TransferSize { blocks: 2, weight: 0.15 },
                TransferSize { blocks: 4, weight: 0.10 },
                TransferSize { blocks: 8, weight: 0.05 },
            ],
        }
    }
}

impl WorkloadProfile {
    /// Profile for an ASU
    pub fn asu(&self, asu: Asu) -> &AsuProfile {
        &self.asus[asu.index()]
    }

    /// Normalized probability of selecting an ASU
    pub fn asu_probability(&self, asu: Asu) -> f64 {
        let total: f64 = self.asus.iter().map(|a| a.weight).sum();
        if total > 0.0 {
            self.asu(asu).weight / total
        } else {
            0.0
        }
    }

    /// Smallest transfer length in the table
    pub fn min_transfer_blocks(&self) -> u32 {
        self.transfer_sizes.iter().map(|t| t.blocks).min().unwrap_or(1)
    }

    /// Weighted mean transfer length in blocks
    pub fn mean_transfer_blocks(&self) -> f64 {
        let total: f64 = self.transfer_sizes.iter().map(|t| t.weight).sum();
        if total <= 0.0 {
            return 0.0;
        }
        self.transfer_sizes
            .iter()
            .map(|t| t.blocks as f64 * t.weight)
            .sum::<f64>()
            / total
    }
}

impl fmt::Display for AsuProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "weight={} read={:.1}% streams={} hot={:.0}% of accesses in {:.0}% of blocks",
            self.weight,
            self.read_fraction * 100.0,
            self.streams,
            self.hot_access_fraction * 100.0,
            self.hot_region_fraction * 100.0
        )
    }
}

impl fmt::Display for TransferSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x4K ({})", self.blocks, self.weight)
    }
}
