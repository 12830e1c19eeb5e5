//! spc1 CLI entry point

use anyhow::{Context, Result};
use spc1::config::cli::{Cli, OutputFormat};
use spc1::config::toml::run_config_from_cli;
use spc1::output::{json, text};
use spc1::worker::{run_contexts, DescriptorSink, RunOptions};
use spc1::IoDescriptor;
use std::sync::Arc;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Logs go to stderr so descriptor lines and JSON stay clean on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&cli.log_level)
                .with_context(|| format!("Invalid log filter: {}", cli.log_level))?,
        )
        .with_writer(std::io::stderr)
        .init();

    cli.validate()?;

    let run = run_config_from_cli(&cli)?;
    debug!(?run, "Resolved run configuration");

    let config = run.build().context("Configuration validation failed")?;

    if config.bsu_count() < config.context_count() {
        warn!(
            bsus = config.bsu_count(),
            contexts = config.context_count(),
            "Fewer BSUs than contexts; each context drives less than one BSU"
        );
    }
    let cpus = num_cpus::get();
    if cli.pace && config.context_count() as usize > cpus {
        warn!(
            contexts = config.context_count(),
            cpus,
            "More paced contexts than CPUs; achieved rate may fall short"
        );
    }

    if cli.output == OutputFormat::Text {
        println!("spc1 v{}", env!("CARGO_PKG_VERSION"));
        println!();
        text::print_configuration(&config);
    }

    if cli.dry_run {
        if cli.output == OutputFormat::Text {
            println!();
            println!("Dry run mode - configuration validated successfully");
        }
        return Ok(());
    }

    let options = RunOptions::new(cli.count).paced(cli.pace);
    let sink: Option<DescriptorSink> = if cli.print {
        Some(Arc::new(|context_id: u32, io: &IoDescriptor| println!("context={}:{}", context_id, io)))
    } else {
        None
    };

    let summary = run_contexts(Arc::new(config), &options, sink)?;

    match cli.output {
        OutputFormat::Text => {
            println!();
            text::print_summary(&summary);
        }
        OutputFormat::Json => println!("{}", json::summary_to_json(&summary)?),
    }

    Ok(())
}
