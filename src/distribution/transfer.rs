//! Transfer-size distribution
//!
//! Weighted discrete choice over transfer lengths in 4 KiB blocks. The
//! default table (1, 2, 4, 8 blocks) is weighted toward single-block I/O.

use super::Spc1Rng;
use crate::config::workload::TransferSize;
use crate::error::Spc1Error;
use crate::Result;
use rand::distributions::{Distribution as RandDistribution, WeightedIndex};

/// Weighted transfer-length sampler
#[derive(Debug, Clone)]
pub struct TransferSizeDistribution {
    sizes: Vec<u32>,
    index: WeightedIndex<f64>,
}

impl TransferSizeDistribution {
    /// Build the sampler from a transfer-size table
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for an empty table, a zero block count,
    /// or weights that are negative, not finite, or all zero.
    pub fn new(table: &[TransferSize]) -> Result<Self> {
        if table.is_empty() {
            return Err(Spc1Error::invalid("transfer size table is empty"));
        }
        if let Some(entry) = table.iter().find(|t| t.blocks == 0) {
            return Err(Spc1Error::invalid(format!(
                "transfer size must be at least one block, got {}",
                entry
            )));
        }
        if let Some(entry) = table.iter().find(|t| !t.weight.is_finite()) {
            return Err(Spc1Error::invalid(format!(
                "transfer size weight must be finite, got {}",
                entry
            )));
        }

        let index = WeightedIndex::new(table.iter().map(|t| t.weight))
            .map_err(|e| Spc1Error::invalid(format!("invalid transfer size weights: {}", e)))?;

        Ok(Self {
            sizes: table.iter().map(|t| t.blocks).collect(),
            index,
        })
    }

    /// Smallest transfer length in the table
    pub fn min_blocks(&self) -> u32 {
        self.sizes.iter().copied().min().unwrap_or(1)
    }

    /// Largest transfer length in the table
    pub fn max_blocks(&self) -> u32 {
        self.sizes.iter().copied().max().unwrap_or(1)
    }

    /// Draw a transfer length in blocks
    #[inline]
    pub fn sample(&self, rng: &mut Spc1Rng) -> u32 {
        self.sizes[self.index.sample(rng)]
    }
}
