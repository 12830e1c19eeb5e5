//! TOML run file parsing
//!
//! A run file carries the scale parameters plus an optional profile:
//!
//! ```toml
//! bsus = 200
//! contexts = 2
//! asu_sizes = [45000, 45000, 10000]
//! seed = 7
//!
//! [profile]
//! iops_per_bsu = 50.0
//! ```

use super::workload::{ASU_COUNT, BLOCK_SIZE};
use super::RunConfig;
use crate::config::cli::Cli;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML run file
pub fn parse_toml_file(path: &Path) -> Result<RunConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML run configuration from string
pub fn parse_toml_string(contents: &str) -> Result<RunConfig> {
    let config: RunConfig = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Build the run configuration from CLI arguments, optionally on top of a run file
pub fn run_config_from_cli(cli: &Cli) -> Result<RunConfig> {
    let base = match &cli.config {
        Some(path) => Some(parse_toml_file(path)?),
        None => None,
    };
    merge_cli_with_config(cli, base)
}

/// Merge CLI arguments with a run file (CLI takes precedence)
pub fn merge_cli_with_config(cli: &Cli, base: Option<RunConfig>) -> Result<RunConfig> {
    let mut config = match base {
        Some(config) => config,
        None => {
            let bsus = cli.bsus.context("--bsus is required without --config")?;
            RunConfig {
                bsus,
                contexts: default_contexts_for(bsus),
                asu_sizes: [0; ASU_COUNT],
                seed: 0,
                profile: Default::default(),
            }
        }
    };

    if let Some(bsus) = cli.bsus {
        config.bsus = bsus;
    }
    if let Some(contexts) = cli.contexts {
        config.contexts = contexts;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    for (slot, arg) in config.asu_sizes.iter_mut().zip([&cli.asu1, &cli.asu2, &cli.asu3]) {
        if let Some(size) = arg {
            *slot = parse_asu_size(size)?;
        }
    }

    Ok(config)
}

/// One context per 100 BSUs
pub fn default_contexts_for(bsus: u32) -> u32 {
    bsus.div_ceil(100).max(1)
}

/// Parse an ASU size into 4 KiB blocks
///
/// A bare number is a block count; a K/M/G/T suffix means bytes.
///
/// ```
/// use spc1::config::toml::parse_asu_size;
///
/// assert_eq!(parse_asu_size("4500").unwrap(), 4500);
/// assert_eq!(parse_asu_size("1G").unwrap(), 262144);
/// ```
pub fn parse_asu_size(s: &str) -> Result<u32> {
    let s = s.trim().to_uppercase();
    if s.is_empty() {
        anyhow::bail!("Empty size string");
    }

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('K') {
        (n, 1024u64)
    } else if let Some(n) = s.strip_suffix('M') {
        (n, 1024 * 1024)
    } else if let Some(n) = s.strip_suffix('G') {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = s.strip_suffix('T') {
        (n, 1024 * 1024 * 1024 * 1024)
    } else {
        (s.as_str(), 0)
    };

    let num: u64 = num_str.parse()
        .with_context(|| format!("Invalid number in size: {}", num_str))?;

    let blocks = if multiplier == 0 {
        num
    } else {
        num.checked_mul(multiplier)
            .with_context(|| format!("Size overflows: {}", s))?
            / BLOCK_SIZE
    };

    u32::try_from(blocks)
        .with_context(|| format!("Size {} is more than {} blocks", s, u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn test_parse_minimal_run_file() {
        let config = parse_toml_string(
            r#"
            bsus = 50
            asu_sizes = [4500, 4500, 1000]
            "#,
        )
        .unwrap();

        assert_eq!(config.bsus, 50);
        assert_eq!(config.contexts, 1);
        assert_eq!(config.seed, 0);
        assert_eq!(config.asu_sizes, [4500, 4500, 1000]);
        assert_eq!(config.profile, Default::default());
    }

    #[test]
    fn test_parse_profile_override() {
        let config = parse_toml_string(
            r#"
            bsus = 10
            contexts = 2
            asu_sizes = [4500, 4500, 1000]

            [profile]
            iops_per_bsu = 100.0

            [[profile.asus]]
            weight = 45.0
            read_fraction = 0.5
            streams = 4
            hot_access_fraction = 0.6
            hot_region_fraction = 0.15

            [[profile.asus]]
            weight = 45.0
            read_fraction = 0.3
            streams = 3

            [[profile.asus]]
            weight = 10.0
            read_fraction = 0.0
            streams = 1

            [[profile.transfer_sizes]]
            blocks = 1
            weight = 1.0
            "#,
        )
        .unwrap();

        assert_eq!(config.profile.iops_per_bsu, 100.0);
        assert_eq!(config.profile.asus[1].hot_region_fraction, 1.0);
        assert_eq!(config.profile.transfer_sizes.len(), 1);

        let workload = config.build().unwrap();
        assert_eq!(workload.target_iops(), 1000.0);
        assert!((workload.asu_probability(crate::config::workload::Asu::Asu3) - 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_parse_missing_required() {
        assert!(parse_toml_string("contexts = 2").is_err());
    }

    #[test]
    fn test_parse_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bsus = 200\ncontexts = 2\nasu_sizes = [45000, 45000, 10000]\nseed = 3").unwrap();

        let config = parse_toml_file(file.path()).unwrap();
        assert_eq!(config.bsus, 200);
        assert_eq!(config.seed, 3);
    }

    #[test]
    fn test_parse_toml_file_missing() {
        let err = parse_toml_file(Path::new("/nonexistent/run.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_merge_cli_over_file() {
        let cli = Cli::try_parse_from(["spc1", "-c", "x.toml", "--contexts", "4", "--asu3", "40M"]).unwrap();
        let base = parse_toml_string("bsus = 200\nasu_sizes = [45000, 45000, 10000]").unwrap();

        let merged = merge_cli_with_config(&cli, Some(base)).unwrap();
        assert_eq!(merged.bsus, 200);
        assert_eq!(merged.contexts, 4);
        assert_eq!(merged.asu_sizes, [45000, 45000, 10240]);
    }

    #[test]
    fn test_merge_cli_only() {
        let cli = Cli::try_parse_from([
            "spc1", "--bsus", "250", "--asu1", "45G", "--asu2", "45G", "--asu3", "10G",
        ])
        .unwrap();

        let merged = merge_cli_with_config(&cli, None).unwrap();
        assert_eq!(merged.contexts, 3);
        assert_eq!(merged.asu_sizes, [45 * 262144, 45 * 262144, 10 * 262144]);
    }

    #[test]
    fn test_parse_asu_size() {
        assert_eq!(parse_asu_size("4500").unwrap(), 4500);
        assert_eq!(parse_asu_size("4k").unwrap(), 1);
        assert_eq!(parse_asu_size("1M").unwrap(), 256);
        assert!(parse_asu_size("").is_err());
        assert!(parse_asu_size("abc").is_err());
        assert!(parse_asu_size("64T").is_err());
    }

    #[test]
    fn test_default_contexts() {
        assert_eq!(default_contexts_for(1), 1);
        assert_eq!(default_contexts_for(100), 1);
        assert_eq!(default_contexts_for(200), 2);
        assert_eq!(default_contexts_for(201), 3);
    }
}
