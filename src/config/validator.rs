//! Configuration validation
//!
//! Every check returns `InvalidConfiguration` with a message naming the
//! offending field, so setup failures surface before any descriptor exists.

use super::workload::*;
use crate::error::Spc1Error;
use crate::Result;

/// Validate the scale parameters against a profile
pub fn validate_scale(
    bsus: u32,
    contexts: u32,
    asu_sizes: &[u32; ASU_COUNT],
    profile: &WorkloadProfile,
) -> Result<()> {
    if contexts == 0 {
        return Err(Spc1Error::invalid("context count must be at least 1"));
    }

    if bsus == 0 {
        return Err(Spc1Error::invalid("BSU count must be at least 1"));
    }

    let min_transfer = profile.min_transfer_blocks();
    for asu in Asu::ALL {
        let size = asu_sizes[asu.index()];
        let streams = profile.asu(asu).streams;

        if size == 0 {
            return Err(Spc1Error::invalid(format!("ASU{} size must be positive", asu)));
        }

        // Every stream needs room for at least one minimum-length transfer
        let required = u64::from(streams.max(1)) * u64::from(min_transfer);
        if u64::from(size) < required {
            return Err(Spc1Error::invalid(format!(
                "ASU{} size {} blocks is too small for {} streams of {}-block transfers",
                asu, size, streams, min_transfer
            )));
        }
    }

    Ok(())
}

/// Validate a workload profile
pub fn validate_profile(profile: &WorkloadProfile) -> Result<()> {
    if !profile.iops_per_bsu.is_finite() || profile.iops_per_bsu <= 0.0 {
        return Err(Spc1Error::invalid(format!(
            "iops_per_bsu must be positive, got {}",
            profile.iops_per_bsu
        )));
    }

    for asu in Asu::ALL {
        validate_asu_profile(asu, profile.asu(asu))?;
    }

    // Selection and transfer weights are checked when their samplers are built

    Ok(())
}

/// Validate one ASU profile
fn validate_asu_profile(asu: Asu, p: &AsuProfile) -> Result<()> {
    if p.streams == 0 || p.streams > MAX_STREAMS_PER_ASU {
        return Err(Spc1Error::invalid(format!(
            "ASU{} streams must be between 1 and {}, got {}",
            asu, MAX_STREAMS_PER_ASU, p.streams
        )));
    }

    if !(0.0..=1.0).contains(&p.read_fraction) {
        return Err(Spc1Error::invalid(format!(
            "ASU{} read_fraction must be between 0.0 and 1.0, got {}",
            asu, p.read_fraction
        )));
    }

    if !(0.0..=1.0).contains(&p.hot_access_fraction) {
        return Err(Spc1Error::invalid(format!(
            "ASU{} hot_access_fraction must be between 0.0 and 1.0, got {}",
            asu, p.hot_access_fraction
        )));
    }

    if !(p.hot_region_fraction > 0.0 && p.hot_region_fraction <= 1.0) {
        return Err(Spc1Error::invalid(format!(
            "ASU{} hot_region_fraction must be in (0.0, 1.0], got {}",
            asu, p.hot_region_fraction
        )));
    }

    Ok(())
}
