//! Benchmark session
//!
//! A `Session` publishes one `WorkloadConfig` to any number of contexts.
//! The configuration may be replaced freely until the first generator is
//! built from it; after that `initialize` fails with `AlreadyInitialized`
//! and the published configuration stays in force for the rest of the
//! session.
//!
//! Generators are counted by the configuration itself, so the ones built
//! through `create_generator`, `Generator::new` or
//! `worker::run_contexts` all pin it. The mutex is only taken by the
//! session's own methods; generators never touch the session again.
//!
//! # Example
//!
//! ```
//! use spc1::{Session, Spc1Error};
//!
//! let session = Session::new();
//! session.initialize(50, 1, 4500, 4500, 1000)?;
//! let mut generator = session.create_generator(0)?;
//! generator.generate()?;
//!
//! assert_eq!(
//!     session.initialize(100, 1, 4500, 4500, 1000).unwrap_err(),
//!     Spc1Error::AlreadyInitialized
//! );
//! # Ok::<(), Spc1Error>(())
//! ```

use crate::config::WorkloadConfig;
use crate::error::Spc1Error;
use crate::generator::Generator;
use crate::Result;
use std::sync::{Arc, Mutex, MutexGuard};

/// Holder of the published workload configuration
#[derive(Debug, Default)]
pub struct Session {
    config: Mutex<Option<Arc<WorkloadConfig>>>,
}

impl Session {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and publish a configuration with the default profile
    ///
    /// # Errors
    ///
    /// - `InvalidConfiguration` if the parameters are rejected
    /// - `AlreadyInitialized` if a generator has been built from the
    ///   published configuration
    pub fn initialize(
        &self,
        bsus: u32,
        contexts: u32,
        asu1: u32,
        asu2: u32,
        asu3: u32,
    ) -> Result<Arc<WorkloadConfig>> {
        // Reject before doing any validation work
        if is_pinned(&self.lock()) {
            return Err(Spc1Error::AlreadyInitialized);
        }
        let config = WorkloadConfig::new(bsus, contexts, asu1, asu2, asu3)?;
        self.publish(config)
    }

    /// Publish an already-built configuration
    ///
    /// # Errors
    ///
    /// Returns `AlreadyInitialized` if a generator has been built from the
    /// published configuration.
    pub fn publish(&self, config: WorkloadConfig) -> Result<Arc<WorkloadConfig>> {
        let mut current = self.lock();
        if is_pinned(&current) {
            return Err(Spc1Error::AlreadyInitialized);
        }
        let config = Arc::new(config);
        *current = Some(config.clone());
        Ok(config)
    }

    /// Currently published configuration, if any
    pub fn config(&self) -> Option<Arc<WorkloadConfig>> {
        self.lock().clone()
    }

    /// Number of generators built from the published configuration
    pub fn generators_created(&self) -> u64 {
        self.lock().as_ref().map_or(0, |config| config.generators_created())
    }

    /// Create the generator for a context
    ///
    /// # Errors
    ///
    /// Returns `NotInitialized` if no configuration has been published.
    pub fn create_generator(&self, context_id: u32) -> Result<Generator> {
        let config = self.lock().clone().ok_or(Spc1Error::NotInitialized)?;
        Ok(Generator::new(config, context_id))
    }

    fn lock(&self) -> MutexGuard<'_, Option<Arc<WorkloadConfig>>> {
        // Plain data; a panic elsewhere cannot leave it half-written
        self.config.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn is_pinned(current: &Option<Arc<WorkloadConfig>>) -> bool {
    current
        .as_ref()
        .is_some_and(|config| config.generators_created() > 0)
}
