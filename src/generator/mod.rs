//! Per-context descriptor synthesis
//!
//! A `Generator` is the state of one context: its random source and its
//! virtual clock. It reads the shared `WorkloadConfig` and never writes to
//! anything but itself, so generators for different contexts run on
//! different threads without any synchronization.
//!
//! Each call to [`Generator::generate`] performs, in order:
//!
//! 1. ASU selection (cumulative-weight lookup)
//! 2. Read/write decision against the ASU's read fraction
//! 3. Stream choice, uniform over the ASU's streams
//! 4. Transfer length from the transfer table, capped at the ASU size
//! 5. Offset from the ASU's hot-region distribution
//! 6. Exponential inter-arrival delay added to the virtual clock
//!
//! The generator never sleeps. `when` only says when the caller should
//! issue the I/O; see [`crate::util::pacing::Pacer`].
//!
//! # Example
//!
//! ```
//! use spc1::{Generator, WorkloadConfig};
//! use std::sync::Arc;
//!
//! let config = Arc::new(WorkloadConfig::new(50, 1, 4500, 4500, 1000)?);
//! let mut generator = Generator::new(config, 0);
//!
//! let io = generator.generate()?;
//! assert!(io.offset + io.blocks <= 4500);
//! println!("{}", io);
//! # Ok::<(), spc1::Spc1Error>(())
//! ```

pub mod descriptor;

use crate::config::WorkloadConfig;
use crate::distribution::{Distribution, Spc1Rng};
use crate::error::Spc1Error;
use crate::Result;
use descriptor::IoDescriptor;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;

/// Synthesis state of one context
#[derive(Debug)]
pub struct Generator {
    config: Arc<WorkloadConfig>,
    context_id: u32,
    rng: Spc1Rng,
    clock: Duration,
    generated: u64,
}

impl Generator {
    /// Create the generator for a context
    ///
    /// The random source is seeded from the run seed and `context_id`, so
    /// the same pair always reproduces the same descriptor sequence.
    /// The generator is counted against `config`, which pins it in any
    /// `Session` that published it.
    pub fn new(config: Arc<WorkloadConfig>, context_id: u32) -> Self {
        config.register_generator();
        let rng = Spc1Rng::seed_from_u64(context_seed(config.seed(), context_id));
        Self {
            config,
            context_id,
            rng,
            clock: Duration::ZERO,
            generated: 0,
        }
    }

    /// Context this generator drives
    pub fn context_id(&self) -> u32 {
        self.context_id
    }

    /// Shared workload configuration
    pub fn config(&self) -> &Arc<WorkloadConfig> {
        &self.config
    }

    /// Scheduled time of the most recent descriptor
    pub fn virtual_clock(&self) -> Duration {
        self.clock
    }

    /// Number of descriptors produced so far
    pub fn generated(&self) -> u64 {
        self.generated
    }

    /// Produce the next descriptor
    ///
    /// # Errors
    ///
    /// Returns `GeneratorFault` if an internal invariant is violated (an
    /// unrepresentable delay, clock overflow, or an out-of-bounds
    /// descriptor). The virtual clock and descriptor count are left
    /// unchanged in that case; the random source is not rewound.
    pub fn generate(&mut self) -> Result<IoDescriptor> {
        let config = &*self.config;
        let rng = &mut self.rng;

        let asu = config.selector().sample(rng);
        let is_read = rng.gen::<f64>() < config.read_fraction(asu);
        let streams = config.streams(asu);
        let stream = rng.gen_range(0..streams);

        let asu_size = config.asu_size(asu);
        let blocks = config.transfer().sample(rng).min(asu_size);

        // Valid start positions so that offset + blocks <= asu_size
        let positions = u64::from(asu_size - blocks) + 1;
        let offset = config.address(asu).next_block(rng, positions);
        let offset = u32::try_from(offset)
            .map_err(|_| Spc1Error::fault(format!("offset {} exceeds block range", offset)))?;

        let delay = config.arrival().next_delay(rng)?;
        let when = self
            .clock
            .checked_add(delay)
            .ok_or_else(|| Spc1Error::fault("virtual clock overflow"))?;

        let descriptor = IoDescriptor {
            asu,
            is_read,
            blocks,
            stream,
            offset,
            when,
        };
        descriptor.check_bounds(asu_size, streams)?;

        self.clock = when;
        self.generated += 1;
        Ok(descriptor)
    }
}

/// Mix the run seed with a context id
fn context_seed(seed: u64, context_id: u32) -> u64 {
    seed ^ (u64::from(context_id) + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
