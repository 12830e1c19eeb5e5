//! Human-readable text output

use crate::config::workload::Asu;
use crate::config::WorkloadConfig;
use crate::util::time::{calculate_throughput, format_duration, format_rate, format_throughput};
use crate::worker::RunSummary;

/// Print the effective workload configuration
pub fn print_configuration(config: &WorkloadConfig) {
    println!("Configuration:");
    println!("  BSUs:        {}", config.bsu_count());
    println!("  Contexts:    {}", config.context_count());
    println!("  Seed:        {}", config.seed());
    println!(
        "  Target:      {} IOPS ({} per context)",
        format_rate(config.target_iops()),
        format_rate(config.context_iops())
    );
    for asu in Asu::ALL {
        println!(
            "  ASU{}:        {} blocks, p={:.3}, {}",
            asu,
            config.asu_size(asu),
            config.asu_probability(asu),
            config.profile().asu(asu)
        );
    }
    let sizes: Vec<String> = config
        .profile()
        .transfer_sizes
        .iter()
        .map(|t| t.to_string())
        .collect();
    println!("  Transfers:   {}", sizes.join(", "));
}

/// Print run results to console
pub fn print_summary(summary: &RunSummary) {
    let stats = &summary.stats;

    println!("═══════════════════════════════════════════════════════════");
    println!("                    WORKLOAD SUMMARY");
    println!("═══════════════════════════════════════════════════════════");
    println!();
    println!("Elapsed Time: {:.3}s", summary.elapsed.as_secs_f64());
    println!("Paced:        {}", if summary.paced { "yes" } else { "no" });
    println!();

    println!("Operations:");
    println!("  Total:  {} ({} reads, {} writes)", stats.total_ops(), stats.read_ops(), stats.write_ops());
    println!("  Target: {} IOPS", format_rate(summary.target_iops));
    println!("  Schedule rate: {} IOPS", format_rate(summary.virtual_iops()));
    if summary.paced {
        println!("  Achieved rate: {} IOPS", format_rate(summary.wall_iops()));
        println!(
            "  Bandwidth:     {}",
            format_throughput(calculate_throughput(stats.total_bytes(), summary.elapsed))
        );
    }
    println!();

    println!("Per ASU:");
    for asu in Asu::ALL {
        let counters = stats.asu(asu);
        let share = stats.asu_fraction(asu).unwrap_or(0.0) * 100.0;
        let reads = counters
            .read_fraction()
            .map(|r| format!("{:.2}%", r * 100.0))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  ASU{}: {:>10} ops ({:>6.2}%)  read rate {:>7}  blocks {}",
            asu,
            counters.ops(),
            share,
            reads,
            counters.blocks()
        );
    }

    let lateness = stats.lateness();
    if !lateness.is_empty() {
        println!();
        println!("Dispatch Lateness:");
        if let Some(mean) = lateness.mean() {
            println!("  mean:  {}", format_duration(mean));
        }
        for p in [50.0, 99.0, 99.9] {
            if let Some(value) = lateness.percentile(p) {
                println!("  p{:<5} {}", p, format_duration(value));
            }
        }
        if let Some(max) = lateness.max() {
            println!("  max:   {}", format_duration(max));
        }
    }

    if summary.contexts.len() > 1 {
        println!();
        println!("Per Context:");
        for context in &summary.contexts {
            println!(
                "  context {:>3}: {} ops, schedule {} IOPS, elapsed {:.3}s",
                context.context_id,
                context.ops,
                format_rate(context.virtual_iops()),
                context.elapsed.as_secs_f64()
            );
        }
    }
}
