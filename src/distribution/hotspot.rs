//! Hot-region distribution
//!
//! Models locality of reference: with probability `access_fraction` an access
//! is drawn uniformly from the leading `region_fraction` of the range,
//! otherwise uniformly from the whole range. With `access_fraction = 0.6` and
//! `region_fraction = 0.15`, the first 15% of blocks receive roughly
//! `0.6 + 0.4 * 0.15 = 66%` of all accesses.
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use spc1::distribution::{Distribution, Spc1Rng, hotspot::HotspotDistribution};
//!
//! let dist = HotspotDistribution::new(0.6, 0.15);
//! let mut rng = Spc1Rng::seed_from_u64(3);
//! assert!(dist.next_block(&mut rng, 1000) < 1000);
//! ```

use super::uniform::UniformDistribution;
use super::{Distribution, Spc1Rng};
use rand::Rng;

/// Hot/cold block distribution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HotspotDistribution {
    /// Probability of an access landing in the hot region
    access_fraction: f64,
    /// Hot region size relative to the full range
    region_fraction: f64,
}

impl HotspotDistribution {
    /// Create a hot-region distribution
    ///
    /// Both fractions are clamped into range; `WorkloadConfig` validation
    /// rejects out-of-range values before they get here.
    pub fn new(access_fraction: f64, region_fraction: f64) -> Self {
        Self {
            access_fraction: access_fraction.clamp(0.0, 1.0),
            region_fraction: region_fraction.clamp(0.0, 1.0),
        }
    }

    /// Probability of an access landing in the hot region
    pub fn access_fraction(&self) -> f64 {
        self.access_fraction
    }

    /// Number of blocks in the hot region of a `num_blocks` range (at least 1)
    pub fn hot_blocks(&self, num_blocks: u64) -> u64 {
        let hot = (num_blocks as f64 * self.region_fraction).round() as u64;
        hot.clamp(1, num_blocks.max(1))
    }
}

impl Distribution for HotspotDistribution {
    fn next_block(&self, rng: &mut Spc1Rng, num_blocks: u64) -> u64 {
        // The coin is drawn for every call, single-position ranges included
        let hot = rng.gen::<f64>() < self.access_fraction;
        if num_blocks <= 1 {
            return 0;
        }

        let range = if hot { self.hot_blocks(num_blocks) } else { num_blocks };

        UniformDistribution.next_block(rng, range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_hotspot_bounds() {
        let dist = HotspotDistribution::new(0.6, 0.15);
        let mut rng = Spc1Rng::seed_from_u64(9);

        for num_blocks in [1u64, 2, 7, 1000, 1 << 32] {
            for _ in 0..200 {
                assert!(dist.next_block(&mut rng, num_blocks) < num_blocks);
            }
        }
    }

    #[test]
    fn test_hotspot_zero_range() {
        let dist = HotspotDistribution::new(0.6, 0.15);
        let mut rng = Spc1Rng::seed_from_u64(9);
        assert_eq!(dist.next_block(&mut rng, 0), 0);
    }

    #[test]
    fn test_hotspot_skew() {
        let dist = HotspotDistribution::new(0.6, 0.15);
        let mut rng = Spc1Rng::seed_from_u64(42);
        let num_blocks = 10_000u64;
        let hot_limit = dist.hot_blocks(num_blocks);
        assert_eq!(hot_limit, 1500);

        let samples = 50_000;
        let in_hot = (0..samples)
            .filter(|_| dist.next_block(&mut rng, num_blocks) < hot_limit)
            .count();

        // Expected 0.6 + 0.4 * 0.15 = 0.66
        let fraction = in_hot as f64 / samples as f64;
        assert!((fraction - 0.66).abs() < 0.02, "hot fraction {}", fraction);
    }

    #[test]
    fn test_hotspot_disabled_is_uniform() {
        let dist = HotspotDistribution::new(0.0, 0.15);
        let mut rng = Spc1Rng::seed_from_u64(5);
        let num_blocks = 1000u64;

        let samples = 20_000;
        let in_first_tenth = (0..samples)
            .filter(|_| dist.next_block(&mut rng, num_blocks) < num_blocks / 10)
            .count();

        let fraction = in_first_tenth as f64 / samples as f64;
        assert!((fraction - 0.10).abs() < 0.015, "first tenth fraction {}", fraction);
    }

    #[test]
    fn test_single_position_draws_coin() {
        let dist = HotspotDistribution::new(0.6, 0.15);
        let mut rng = Spc1Rng::seed_from_u64(17);
        let mut expected = Spc1Rng::seed_from_u64(17);

        assert_eq!(dist.next_block(&mut rng, 1), 0);
        let _coin: f64 = expected.gen();
        assert_eq!(rng.gen::<u64>(), expected.gen::<u64>());
    }

    #[test]
    fn test_hot_blocks_minimum() {
        let dist = HotspotDistribution::new(1.0, 0.01);
        assert_eq!(dist.hot_blocks(10), 1);
        assert_eq!(dist.hot_blocks(0), 1);
        assert_eq!(HotspotDistribution::new(1.0, 1.0).hot_blocks(50), 50);
    }
}
