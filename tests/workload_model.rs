//! Statistical properties of generated descriptor streams

use spc1::{Asu, Generator, Spc1Error, WorkloadConfig, WorkloadProfile};
use std::sync::Arc;
use std::time::Duration;

/// 45/45/10 split of a 1GiB-per-BSU volume in 4KiB blocks
fn sizes(bsus: u32) -> (u32, u32, u32) {
    let total = bsus * 262_144 / 4;
    (total * 45 / 100, total * 45 / 100, total / 10)
}

fn config(bsus: u32, contexts: u32) -> Arc<WorkloadConfig> {
    let (a1, a2, a3) = sizes(bsus);
    Arc::new(WorkloadConfig::new(bsus, contexts, a1, a2, a3).unwrap())
}

#[test]
fn descriptors_stay_in_bounds_across_scales() {
    let cases = [
        (1, 1, 16, 16, 8),
        (10, 1, 4, 3, 1),
        (50, 2, 4500, 4500, 1000),
        (200, 4, 100_000, 100_000, 20_000),
        (3000, 30, u32::MAX, u32::MAX, u32::MAX),
    ];

    for (bsus, contexts, a1, a2, a3) in cases {
        let config = Arc::new(WorkloadConfig::new(bsus, contexts, a1, a2, a3).unwrap());
        for context_id in 0..contexts {
            let mut generator = Generator::new(config.clone(), context_id);
            let mut last = Duration::ZERO;
            for _ in 0..2_000 {
                let io = generator.generate().unwrap();
                let size = config.asu_size(io.asu);
                assert!(io.blocks >= 1);
                assert!(
                    u64::from(io.offset) + u64::from(io.blocks) <= u64::from(size),
                    "{} overruns ASU size {}",
                    io,
                    size
                );
                assert!(io.stream < config.streams(io.asu));
                assert!(io.when >= last);
                last = io.when;
            }
        }
    }
}

#[test]
fn asu_shares_converge() {
    let config = config(50, 1);
    let mut generator = Generator::new(config.clone(), 0);
    let n = 100_000;

    let mut counts = [0u64; 3];
    for _ in 0..n {
        counts[generator.generate().unwrap().asu.index()] += 1;
    }

    for asu in Asu::ALL {
        let observed = counts[asu.index()] as f64 / n as f64;
        let expected = config.asu_probability(asu);
        assert!(
            (observed - expected).abs() < 0.02,
            "ASU{} share {} expected {}",
            asu,
            observed,
            expected
        );
    }
}

#[test]
fn read_fractions_converge() {
    let config = config(50, 1);
    let mut generator = Generator::new(config.clone(), 0);

    let mut reads = [0u64; 3];
    let mut totals = [0u64; 3];
    for _ in 0..200_000 {
        let io = generator.generate().unwrap();
        totals[io.asu.index()] += 1;
        if io.is_read {
            reads[io.asu.index()] += 1;
        }
    }

    for asu in Asu::ALL {
        let observed = reads[asu.index()] as f64 / totals[asu.index()] as f64;
        let expected = config.read_fraction(asu);
        assert!(
            (observed - expected).abs() < 0.02,
            "ASU{} read fraction {} expected {}",
            asu,
            observed,
            expected
        );
    }
    assert_eq!(reads[Asu::Asu3.index()], 0);
}

#[test]
fn streams_are_all_used() {
    let config = config(50, 1);
    let mut generator = Generator::new(config.clone(), 0);

    let mut seen = [[false; 8]; 3];
    for _ in 0..20_000 {
        let io = generator.generate().unwrap();
        seen[io.asu.index()][io.stream as usize] = true;
    }

    for asu in Asu::ALL {
        let used = seen[asu.index()].iter().filter(|&&s| s).count() as u32;
        assert_eq!(used, config.streams(asu), "ASU{}", asu);
    }
}

#[test]
fn single_context_virtual_rate() {
    let mut generator = Generator::new(config(50, 1), 0);
    let n = 100_000;

    let mut last = Duration::ZERO;
    for _ in 0..n {
        last = generator.generate().unwrap().when;
    }

    let iops = n as f64 / last.as_secs_f64();
    assert!(iops > 2_450.0 && iops < 2_550.0, "virtual IOPS {}", iops);
}

#[test]
fn rate_scales_linearly_with_bsus() {
    let config = config(200, 4);
    assert_eq!(config.target_iops(), 10_000.0);
    assert_eq!(config.context_iops(), 2_500.0);

    let n = 50_000;
    let mut aggregate = 0.0;
    for context_id in 0..4 {
        let mut generator = Generator::new(config.clone(), context_id);
        let mut last = Duration::ZERO;
        for _ in 0..n {
            last = generator.generate().unwrap().when;
        }
        let iops = n as f64 / last.as_secs_f64();
        assert!(iops > 2_400.0 && iops < 2_600.0, "context {} IOPS {}", context_id, iops);
        aggregate += iops;
    }

    assert!(aggregate > 9_700.0 && aggregate < 10_300.0, "aggregate {}", aggregate);
}

#[test]
fn same_seed_same_stream() {
    let config = config(50, 2);
    let mut a = Generator::new(config.clone(), 1);
    let mut b = Generator::new(config, 1);

    for _ in 0..1_000 {
        assert_eq!(a.generate().unwrap(), b.generate().unwrap());
    }
}

#[test]
fn hot_region_attracts_accesses() {
    let config = config(50, 1);
    let mut generator = Generator::new(config.clone(), 0);
    let profile = config.profile().asu(Asu::Asu1).clone();
    let hot_end = (f64::from(config.asu_size(Asu::Asu1)) * profile.hot_region_fraction) as u32;

    let mut total = 0u64;
    let mut hot = 0u64;
    for _ in 0..100_000 {
        let io = generator.generate().unwrap();
        if io.asu == Asu::Asu1 {
            total += 1;
            if io.offset < hot_end {
                hot += 1;
            }
        }
    }

    // Hot accesses plus the uniform share that happens to land there
    let expected = profile.hot_access_fraction
        + (1.0 - profile.hot_access_fraction) * profile.hot_region_fraction;
    let observed = hot as f64 / total as f64;
    assert!((observed - expected).abs() < 0.02, "hot share {} expected {}", observed, expected);
}

#[test]
fn custom_profile_shifts_the_mix() {
    let mut profile = WorkloadProfile::default();
    profile.asus[0].weight = 0.0;
    profile.asus[2].weight = 1.0;

    let (a1, a2, a3) = sizes(50);
    let config =
        Arc::new(WorkloadConfig::with_profile(50, 1, [a1, a2, a3], profile, 7).unwrap());
    let mut generator = Generator::new(config, 0);

    for _ in 0..5_000 {
        assert_ne!(generator.generate().unwrap().asu, Asu::Asu1);
    }
}

#[test]
fn invalid_scale_is_rejected() {
    for (bsus, contexts, a1, a2, a3) in [
        (50, 0, 4500, 4500, 1000),
        (0, 1, 4500, 4500, 1000),
        (50, 1, 0, 4500, 1000),
        (50, 1, 4500, 0, 1000),
        (50, 1, 4500, 4500, 0),
    ] {
        assert!(matches!(
            WorkloadConfig::new(bsus, contexts, a1, a2, a3),
            Err(Spc1Error::InvalidConfiguration(_))
        ));
    }
}
