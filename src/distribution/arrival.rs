//! Inter-arrival timing
//!
//! Each context is an independent Poisson process, so the delay between two
//! consecutive descriptors is exponentially distributed with mean
//! `1 / rate`. Summed over `contexts` processes of rate `target / contexts`
//! the aggregate is a Poisson process of rate `target`.

use super::Spc1Rng;
use crate::error::Spc1Error;
use crate::Result;
use rand_distr::{Distribution as RandDistribution, Exp};
use std::time::Duration;

/// Exponential inter-arrival sampler
#[derive(Debug, Clone, Copy)]
pub struct ExponentialArrival {
    /// Events per second
    rate: f64,
    exp: Exp<f64>,
}

impl ExponentialArrival {
    /// Create a sampler for `rate` events per second
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` unless `rate` is finite and positive.
    pub fn new(rate: f64) -> Result<Self> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(Spc1Error::invalid(format!(
                "arrival rate must be positive and finite, got {}",
                rate
            )));
        }
        let exp = Exp::new(rate)
            .map_err(|e| Spc1Error::invalid(format!("arrival rate {}: {}", rate, e)))?;
        Ok(Self { rate, exp })
    }

    /// Events per second
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Mean delay between events
    pub fn mean_delay(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.rate)
    }

    /// Draw the delay until the next event
    ///
    /// # Errors
    ///
    /// Returns `GeneratorFault` if the sample is not a representable
    /// non-negative duration.
    #[inline]
    pub fn next_delay(&self, rng: &mut Spc1Rng) -> Result<Duration> {
        let secs: f64 = self.exp.sample(rng);
        if !secs.is_finite() || secs < 0.0 {
            return Err(Spc1Error::fault(format!("inter-arrival sample {} out of range", secs)));
        }
        Duration::try_from_secs_f64(secs)
            .map_err(|e| Spc1Error::fault(format!("inter-arrival sample {}: {}", secs, e)))
    }
}
