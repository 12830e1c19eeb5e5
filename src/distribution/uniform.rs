//! Uniform random distribution
//!
//! Every block has equal probability. Used for the cold part of each ASU and
//! for ASUs without a hot region.

use super::{Distribution, Spc1Rng};
use rand::Rng;

/// Uniform random distribution
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformDistribution;

impl Distribution for UniformDistribution {
    #[inline(always)]
    fn next_block(&self, rng: &mut Spc1Rng, num_blocks: u64) -> u64 {
        if num_blocks == 0 {
            return 0;
        }
        rng.gen_range(0..num_blocks)
    }
}
