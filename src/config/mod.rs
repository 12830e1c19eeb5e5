//! Workload model configuration
//!
//! `WorkloadConfig` is the immutable scale configuration for one benchmark
//! run. It is constructed and validated once, then shared read-only (through
//! an `Arc`) by every context's generator. All sampler tables are built here
//! so that descriptor synthesis does no setup work.
//!
//! The only mutable part is a counter of the generators built from the
//! configuration, which `Session` consults before replacing it.
//!
//! `RunConfig` is the serializable form loaded from TOML run files and
//! merged with CLI overrides by the `spc1` binary.

pub mod cli;
pub mod toml;
pub mod validator;
pub mod workload;

use crate::distribution::arrival::ExponentialArrival;
use crate::distribution::hotspot::HotspotDistribution;
use crate::distribution::selector::AsuSelector;
use crate::distribution::transfer::TransferSizeDistribution;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use workload::*;

/// Immutable scale configuration shared by all generators of a run
#[derive(Debug)]
pub struct WorkloadConfig {
    bsu_count: u32,
    context_count: u32,
    asu_sizes: [u32; ASU_COUNT],
    seed: u64,
    profile: WorkloadProfile,

    // Derived once at construction
    selector: AsuSelector,
    address: [HotspotDistribution; ASU_COUNT],
    transfer: TransferSizeDistribution,
    arrival: ExponentialArrival,

    generators: AtomicU64,
}

impl Clone for WorkloadConfig {
    /// Copies the model; the copy starts with no generators
    fn clone(&self) -> Self {
        Self {
            bsu_count: self.bsu_count,
            context_count: self.context_count,
            asu_sizes: self.asu_sizes,
            seed: self.seed,
            profile: self.profile.clone(),
            selector: self.selector.clone(),
            address: self.address,
            transfer: self.transfer.clone(),
            arrival: self.arrival,
            generators: AtomicU64::new(0),
        }
    }
}

impl WorkloadConfig {
    /// Build a configuration with the default profile and run seed 0
    ///
    /// ASU sizes are in 4 KiB blocks.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `contexts` or `bsus` is zero, or an
    /// ASU is too small to host its streams.
    ///
    /// # Example
    ///
    /// ```
    /// use spc1::WorkloadConfig;
    ///
    /// let config = WorkloadConfig::new(50, 1, 4500, 4500, 1000).unwrap();
    /// assert_eq!(config.target_iops(), 2500.0);
    /// ```
    pub fn new(bsus: u32, contexts: u32, asu1: u32, asu2: u32, asu3: u32) -> Result<Self> {
        Self::with_profile(bsus, contexts, [asu1, asu2, asu3], WorkloadProfile::default(), 0)
    }

    /// Build a configuration from an explicit profile and run seed
    pub fn with_profile(
        bsus: u32,
        contexts: u32,
        asu_sizes: [u32; ASU_COUNT],
        profile: WorkloadProfile,
        seed: u64,
    ) -> Result<Self> {
        validator::validate_profile(&profile)?;
        validator::validate_scale(bsus, contexts, &asu_sizes, &profile)?;

        let selector = AsuSelector::new(profile.asus.clone().map(|a| a.weight))?;
        let address = profile
            .asus
            .clone()
            .map(|a| HotspotDistribution::new(a.hot_access_fraction, a.hot_region_fraction));
        let transfer = TransferSizeDistribution::new(&profile.transfer_sizes)?;

        let context_iops = bsus as f64 * profile.iops_per_bsu / contexts as f64;
        let arrival = ExponentialArrival::new(context_iops)?;

        Ok(Self {
            bsu_count: bsus,
            context_count: contexts,
            asu_sizes,
            seed,
            profile,
            selector,
            address,
            transfer,
            arrival,
            generators: AtomicU64::new(0),
        })
    }

    /// Same configuration with a different run seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Number of Business Scaling Units
    pub fn bsu_count(&self) -> u32 {
        self.bsu_count
    }

    /// Number of contexts sharing the aggregate rate
    pub fn context_count(&self) -> u32 {
        self.context_count
    }

    /// Run seed mixed into every context's random source
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Size of an ASU in blocks
    pub fn asu_size(&self, asu: Asu) -> u32 {
        self.asu_sizes[asu.index()]
    }

    /// Sizes of ASU1, ASU2, ASU3 in blocks
    pub fn asu_sizes(&self) -> [u32; ASU_COUNT] {
        self.asu_sizes
    }

    /// Distribution constants in use
    pub fn profile(&self) -> &WorkloadProfile {
        &self.profile
    }

    /// Aggregate target rate over all contexts
    pub fn target_iops(&self) -> f64 {
        self.bsu_count as f64 * self.profile.iops_per_bsu
    }

    /// Target rate of a single context
    pub fn context_iops(&self) -> f64 {
        self.arrival.rate()
    }

    /// Probability of selecting an ASU
    pub fn asu_probability(&self, asu: Asu) -> f64 {
        self.selector.probability(asu)
    }

    /// Read fraction of an ASU
    pub fn read_fraction(&self, asu: Asu) -> f64 {
        self.profile.asu(asu).read_fraction
    }

    /// Stream count of an ASU
    pub fn streams(&self, asu: Asu) -> u32 {
        self.profile.asu(asu).streams
    }

    /// Number of generators built from this configuration
    pub fn generators_created(&self) -> u64 {
        self.generators.load(Ordering::Acquire)
    }

    pub(crate) fn register_generator(&self) {
        self.generators.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn selector(&self) -> &AsuSelector {
        &self.selector
    }

    pub(crate) fn address(&self, asu: Asu) -> &HotspotDistribution {
        &self.address[asu.index()]
    }

    pub(crate) fn transfer(&self) -> &TransferSizeDistribution {
        &self.transfer
    }

    pub(crate) fn arrival(&self) -> &ExponentialArrival {
        &self.arrival
    }
}

/// Serializable run description (TOML run files, CLI overrides)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of Business Scaling Units
    pub bsus: u32,
    /// Number of contexts
    #[serde(default = "default_contexts")]
    pub contexts: u32,
    /// ASU1, ASU2, ASU3 sizes in 4 KiB blocks
    pub asu_sizes: [u32; ASU_COUNT],
    /// Run seed
    #[serde(default)]
    pub seed: u64,
    /// Distribution constants
    #[serde(default)]
    pub profile: WorkloadProfile,
}

fn default_contexts() -> u32 {
    1
}

impl RunConfig {
    /// Validate and build the immutable workload configuration
    pub fn build(&self) -> Result<WorkloadConfig> {
        WorkloadConfig::with_profile(
            self.bsus,
            self.contexts,
            self.asu_sizes,
            self.profile.clone(),
            self.seed,
        )
    }
}
