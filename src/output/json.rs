//! JSON output formatting

use crate::config::workload::Asu;
use crate::util::time::format_duration;
use crate::worker::RunSummary;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Duration with both microseconds and human-readable format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonDuration {
    pub micros: u64,
    pub human: String,
}

impl JsonDuration {
    pub fn from_duration(d: Duration) -> Self {
        Self {
            micros: d.as_micros() as u64,
            human: format_duration(d),
        }
    }
}

/// Per-ASU counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonAsu {
    pub asu: u32,
    pub ops: u64,
    pub reads: u64,
    pub writes: u64,
    pub blocks: u64,
    pub share: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_fraction: Option<f64>,
    pub streams: Vec<u64>,
}

/// Dispatch lateness of paced runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonLateness {
    pub mean: JsonDuration,
    pub p50: JsonDuration,
    pub p99: JsonDuration,
    pub max: JsonDuration,
}

/// Per-context result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonContext {
    pub context_id: u32,
    pub ops: u64,
    pub virtual_iops: f64,
    pub elapsed: JsonDuration,
}

/// Complete run report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSummary {
    pub timestamp: String,
    pub version: String,
    pub paced: bool,
    pub elapsed: JsonDuration,
    pub target_iops: f64,
    pub schedule_iops: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achieved_iops: Option<f64>,
    pub total_ops: u64,
    pub asus: Vec<JsonAsu>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lateness: Option<JsonLateness>,
    pub contexts: Vec<JsonContext>,
}

impl JsonSummary {
    /// Build the report from a run summary
    pub fn from_summary(summary: &RunSummary) -> Self {
        let stats = &summary.stats;

        let asus = Asu::ALL
            .iter()
            .map(|&asu| {
                let counters = stats.asu(asu);
                JsonAsu {
                    asu: asu.number(),
                    ops: counters.ops(),
                    reads: counters.reads,
                    writes: counters.writes,
                    blocks: counters.blocks(),
                    share: stats.asu_fraction(asu).unwrap_or(0.0),
                    read_fraction: counters.read_fraction(),
                    streams: counters.streams.to_vec(),
                }
            })
            .collect();

        let hist = stats.lateness();
        let lateness = match (hist.mean(), hist.percentile(50.0), hist.percentile(99.0), hist.max()) {
            (Some(mean), Some(p50), Some(p99), Some(max)) => Some(JsonLateness {
                mean: JsonDuration::from_duration(mean),
                p50: JsonDuration::from_duration(p50),
                p99: JsonDuration::from_duration(p99),
                max: JsonDuration::from_duration(max),
            }),
            _ => None,
        };

        let contexts = summary
            .contexts
            .iter()
            .map(|c| JsonContext {
                context_id: c.context_id,
                ops: c.ops,
                virtual_iops: c.virtual_iops(),
                elapsed: JsonDuration::from_duration(c.elapsed),
            })
            .collect();

        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            paced: summary.paced,
            elapsed: JsonDuration::from_duration(summary.elapsed),
            target_iops: summary.target_iops,
            schedule_iops: summary.virtual_iops(),
            achieved_iops: summary.paced.then(|| summary.wall_iops()),
            total_ops: stats.total_ops(),
            asus,
            lateness,
            contexts,
        }
    }
}

/// Render a run summary as pretty-printed JSON
pub fn summary_to_json(summary: &RunSummary) -> Result<String> {
    serde_json::to_string_pretty(&JsonSummary::from_summary(summary))
        .context("Failed to serialize summary")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::{run_contexts, RunOptions};
    use crate::WorkloadConfig;
    use std::sync::Arc;

    #[test]
    fn test_summary_json() {
        let config = Arc::new(WorkloadConfig::new(100, 2, 45000, 45000, 10000).unwrap());
        let summary = run_contexts(config, &RunOptions::new(500), None).unwrap();

        let json = summary_to_json(&summary).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["total_ops"], 1000);
        assert_eq!(value["paced"], false);
        assert_eq!(value["asus"].as_array().unwrap().len(), 3);
        assert_eq!(value["asus"][2]["asu"], 3);
        assert_eq!(value["contexts"].as_array().unwrap().len(), 2);
        assert!(value.get("lateness").is_none());
        assert!(value.get("achieved_iops").is_none());
    }

    #[test]
    fn test_json_duration() {
        let d = JsonDuration::from_duration(Duration::from_micros(1500));
        assert_eq!(d.micros, 1500);
        assert_eq!(d.human, "1.50ms");
    }
}
