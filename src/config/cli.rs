//! CLI argument parsing using clap

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Summary output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report
    Text,
    /// JSON document on stdout
    Json,
}

/// spc1 - SPC-1 style synthetic storage workload generator
#[derive(Parser, Debug)]
#[command(name = "spc1")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// TOML run file (CLI options override its values)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of Business Scaling Units
    #[arg(short = 'b', long)]
    pub bsus: Option<u32>,

    /// Number of concurrent contexts (default: one per 100 BSUs)
    #[arg(short = 't', long)]
    pub contexts: Option<u32>,

    /// ASU1 size (blocks, or bytes with K/M/G/T suffix, e.g. 45G)
    #[arg(long)]
    pub asu1: Option<String>,

    /// ASU2 size (blocks, or bytes with K/M/G/T suffix)
    #[arg(long)]
    pub asu2: Option<String>,

    /// ASU3 size (blocks, or bytes with K/M/G/T suffix)
    #[arg(long)]
    pub asu3: Option<String>,

    /// Run seed for reproducible sequences
    #[arg(long)]
    pub seed: Option<u64>,

    /// Descriptors to generate per context
    #[arg(short = 'n', long, default_value = "10000")]
    pub count: u64,

    /// Pace generation in real time (sleep until each descriptor is due)
    #[arg(long)]
    pub pace: bool,

    /// Print every descriptor as it is generated
    #[arg(long)]
    pub print: bool,

    /// Summary output format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Log filter (e.g. info, debug, spc1=trace)
    #[arg(long, env = "SPC1_LOG", default_value = "info")]
    pub log_level: String,

    /// Validate configuration and exit
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate CLI arguments that do not depend on the run file
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.count == 0 {
            anyhow::bail!("count must be at least 1");
        }

        if self.config.is_none() && self.bsus.is_none() {
            anyhow::bail!("either --config or --bsus is required");
        }

        if self.config.is_none() && (self.asu1.is_none() || self.asu2.is_none() || self.asu3.is_none())
        {
            anyhow::bail!("--asu1, --asu2 and --asu3 are required without --config");
        }

        if self.contexts == Some(0) {
            anyhow::bail!("contexts must be at least 1");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_minimal() {
        let cli = Cli::try_parse_from([
            "spc1", "--bsus", "50", "--asu1", "4500", "--asu2", "4500", "--asu3", "1000",
        ])
        .unwrap();
        assert_eq!(cli.bsus, Some(50));
        assert_eq!(cli.count, 10000);
        assert_eq!(cli.output, OutputFormat::Text);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_cli_requires_sizes() {
        let cli = Cli::try_parse_from(["spc1", "--bsus", "50"]).unwrap();
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_cli_config_only() {
        let cli = Cli::try_parse_from(["spc1", "-c", "run.toml", "--output", "json"]).unwrap();
        assert!(cli.validate().is_ok());
        assert_eq!(cli.output, OutputFormat::Json);
    }

    #[test]
    fn test_cli_zero_count() {
        let cli = Cli::try_parse_from(["spc1", "-c", "run.toml", "-n", "0"]).unwrap();
        assert!(cli.validate().is_err());
    }
}
