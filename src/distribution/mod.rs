//! Sampling primitives for descriptor synthesis
//!
//! The generator owns exactly one random source per context and passes it to
//! these samplers, so a context's whole descriptor sequence is a function of
//! its seed. None of the samplers hold mutable state of their own, which lets
//! a single `WorkloadConfig` share them across every context.
//!
//! # Samplers
//!
//! - **Uniform**: equal probability for every block
//! - **Hotspot**: a fraction of accesses confined to a leading hot region
//! - **AsuSelector**: weighted choice among the three ASUs
//! - **TransferSizeDistribution**: weighted discrete transfer lengths
//! - **ExponentialArrival**: Poisson-process inter-arrival delays
//!
//! # Block-Based Design
//!
//! Address samplers return block numbers (0, 1, ..., N-1) in 4 KiB units.
//! Callers pass the number of valid *start* positions, so a transfer of
//! `blocks` against an ASU of `size` blocks samples from `size - blocks + 1`
//! positions and never runs past the end of the ASU.
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use spc1::distribution::{Distribution, Spc1Rng, uniform::UniformDistribution};
//!
//! let mut rng = Spc1Rng::seed_from_u64(7);
//! let block_num = UniformDistribution.next_block(&mut rng, 1024);
//! assert!(block_num < 1024);
//! ```

use rand_xoshiro::Xoshiro256PlusPlus;

/// Random source owned by each generator, reproducible from a `u64` seed
pub type Spc1Rng = Xoshiro256PlusPlus;

/// Distribution trait for block number generation
///
/// # Thread Safety
///
/// Implementations are `Send + Sync` and stateless; all randomness comes from
/// the `rng` argument.
pub trait Distribution: Send + Sync {
    /// Generate next block number within range
    ///
    /// Returns a block number in `[0, num_blocks)`, or 0 when `num_blocks` is 0.
    fn next_block(&self, rng: &mut Spc1Rng, num_blocks: u64) -> u64;
}

pub mod arrival;
pub mod hotspot;
pub mod selector;
pub mod transfer;
pub mod uniform;
