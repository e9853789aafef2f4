//! Latency aggregation and human-readable output.
//!
//! The [`Reporter`] only reads samples and reports; it never touches the
//! backend or the graph.

use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use crate::models::{BuildReport, QueryOutcome, QueryReport, TimingSample};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencyStats {
    pub count: usize,
    pub mean: Duration,
    pub median: Duration,
    pub min: Duration,
    pub max: Duration,
    pub std_dev: Duration,
    pub p50: Duration,
    pub p90: Duration,
    pub p95: Duration,
    pub p99: Duration,
}

impl LatencyStats {
    /// `None` for an empty sample set.
    pub fn from_durations(mut durations: Vec<Duration>) -> Option<Self> {
        if durations.is_empty() {
            return None;
        }
        durations.sort();
        let len = durations.len();
        let count = len as f64;

        let mean_secs = durations.iter().map(|d| d.as_secs_f64()).sum::<f64>() / count;
        let variance = durations
            .iter()
            .map(|d| {
                let diff = d.as_secs_f64() - mean_secs;
                diff * diff
            })
            .sum::<f64>()
            / count;

        let percentile = |p: f64| durations[((count * p) as usize).min(len - 1)];

        Some(LatencyStats {
            count: len,
            mean: Duration::from_secs_f64(mean_secs),
            median: durations[len / 2],
            min: durations[0],
            max: durations[len - 1],
            std_dev: Duration::from_secs_f64(variance.sqrt()),
            p50: percentile(0.50),
            p90: percentile(0.90),
            p95: percentile(0.95),
            p99: percentile(0.99),
        })
    }

    pub fn display(&self, name: &str) {
        info!("{} latency ({} samples):", name, self.count);
        info!("  Mean:     {:.3}ms", ms(self.mean));
        info!("  Median:   {:.3}ms", ms(self.median));
        info!("  Min:      {:.3}ms", ms(self.min));
        info!("  Max:      {:.3}ms", ms(self.max));
        info!("  Std Dev:  {:.3}ms", ms(self.std_dev));
        info!("  P50:      {:.3}ms", ms(self.p50));
        info!("  P90:      {:.3}ms", ms(self.p90));
        info!("  P95:      {:.3}ms", ms(self.p95));
        info!("  P99:      {:.3}ms", ms(self.p99));
    }
}

fn ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    quiet: bool,
}

impl Reporter {
    pub fn new() -> Self {
        Self { quiet: false }
    }

    /// Suppresses per-sample and progress lines; summaries are still logged.
    pub fn quiet() -> Self {
        Self { quiet: true }
    }

    pub fn progress(&self, sample: &TimingSample) {
        if self.quiet {
            return;
        }
        info!(
            label = sample.label,
            "Added {} edges in time = {:.3}s",
            sample.index,
            sample.duration.as_secs_f64()
        );
    }

    pub fn query_sample(&self, v1: &str, v2: &str, outcome: &QueryOutcome, latency: Duration) {
        if self.quiet {
            return;
        }
        info!(
            latency_ms = ms(latency),
            "Distance between {} and {} is {}", v1, v2, outcome
        );
    }

    pub fn summarize_build(&self, report: &BuildReport) {
        info!("=== Build Results ({}) ===", report.backend);
        info!(
            "Time taken to add {} edges: {:.3} seconds",
            report.edges_attempted,
            report.duration.as_secs_f64()
        );
        info!("  Succeeded: {}", report.edges_succeeded());
        info!("  Failed:    {}", report.edges_failed);
        if report.edges_failed > 0 {
            let f = &report.failures;
            warn!(
                "Failures by kind: connection={} backend={} timeout={} not_found={}",
                f.connection, f.backend, f.timeout, f.not_found
            );
        }
        if let Some(per_edge) = report.per_edge() {
            info!("  Time per edge: {:.3}ms", ms(per_edge));
        }
        if let Some(stats) = &report.latency {
            stats.display("add-edge");
        }
    }

    pub fn summarize_query(&self, report: &QueryReport) {
        info!("---------------------------------------");
        info!("=== Query Results ({}) ===", report.backend);
        info!(
            "Total time taken to find distance between two random nodes ({} ops): {:.3} seconds",
            report.issued(),
            report.duration.as_secs_f64()
        );
        if let Some(per_query) = report.per_query() {
            info!("Time taken per op: {:.6} seconds", per_query.as_secs_f64());
        }
        info!(
            "  Answered: {}  No path: {}  Not found: {}  Failed: {}  Skipped: {}",
            report.answered(),
            report.no_path(),
            report.not_found(),
            report.failed(),
            report.skipped()
        );
        if let Some(stats) = &report.latency {
            stats.display("get-degrees");
        }
        if let Some(warning) = &report.warning {
            warn!("{}", warning);
        }
    }

    /// Rank backends by mean latency and log the ratio between the fastest and the rest.
    pub fn compare(&self, operation: &str, results: &[(&str, &LatencyStats)]) -> Option<String> {
        let mut ranked: Vec<_> = results.to_vec();
        ranked.sort_by_key(|(_, stats)| stats.mean);
        let (fastest, best) = *ranked.first()?;
        if ranked.len() < 2 {
            return None;
        }

        info!("=== Performance Comparison: {} ===", operation);
        for (name, stats) in &ranked[1..] {
            let ratio = stats.mean.as_secs_f64() / best.mean.as_secs_f64().max(f64::EPSILON);
            info!(
                "🏆 {} is FASTER than {} by {:.2}x ({:.3}ms vs {:.3}ms)",
                fastest,
                name,
                ratio,
                ms(best.mean),
                ms(stats.mean)
            );
        }
        Some(fastest.to_string())
    }
}
