//! ASU selection
//!
//! Weighted choice over the three ASU weights of a profile. ASUs with weight
//! zero are never selected.

use super::Spc1Rng;
use crate::config::workload::{Asu, ASU_COUNT};
use crate::error::Spc1Error;
use crate::Result;
use rand::distributions::{Distribution as RandDistribution, WeightedIndex};

/// Chooses an ASU according to fixed selection weights
#[derive(Debug, Clone)]
pub struct AsuSelector {
    /// Normalized probabilities, for reporting
    probabilities: [f64; ASU_COUNT],
    index: WeightedIndex<f64>,
}

impl AsuSelector {
    /// Build a selector from raw (unnormalized) weights
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if a weight is negative or not finite,
    /// or if all weights are zero.
    pub fn new(weights: [f64; ASU_COUNT]) -> Result<Self> {
        if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(Spc1Error::invalid(format!(
                "ASU weight must be a non-negative number, got {}",
                w
            )));
        }

        let index = WeightedIndex::new(weights)
            .map_err(|e| Spc1Error::invalid(format!("invalid ASU weights: {}", e)))?;

        let total: f64 = weights.iter().sum();
        Ok(Self {
            probabilities: weights.map(|w| w / total),
            index,
        })
    }

    /// Normalized probability of an ASU
    pub fn probability(&self, asu: Asu) -> f64 {
        self.probabilities[asu.index()]
    }

    /// Draw an ASU
    #[inline]
    pub fn sample(&self, rng: &mut Spc1Rng) -> Asu {
        Asu::ALL[self.index.sample(rng)]
    }
}
