use std::time::Instant;

use futures::stream::{self, StreamExt};
use rand::Rng;
use tracing::{info, warn};

use super::{BenchmarkRunner, BUILD_PROGRESS_LABEL};
use crate::errors::BackendError;
use crate::interfaces::BackendAdapter;
use crate::models::{BuildReport, FailureCounts, Graph, TimingSample};
use crate::reporter::LatencyStats;

impl<R: Rng> BenchmarkRunner<R> {
    /// Reset the backend, then insert every edge of `graph` in order.
    ///
    /// A failed reset aborts the phase before any insert. Individual insert
    /// failures are counted and the load continues.
    pub async fn run_build(
        &self,
        graph: &Graph,
        adapter: &dyn BackendAdapter,
    ) -> Result<BuildReport, BackendError> {
        info!(
            backend = adapter.name(),
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "Resetting backend before build"
        );
        adapter.reset().await?;

        let interval = self.config.progress_interval;
        let mut failures = FailureCounts::default();
        let mut checkpoints = Vec::new();
        let mut latencies = Vec::with_capacity(graph.edge_count());
        let mut processed = 0;

        let start = Instant::now();
        let mut last = start;

        let mut results = stream::iter(graph.edges.iter())
            .map(|edge| async move {
                let started = Instant::now();
                let result = adapter
                    .add_edge(edge.source.as_str(), edge.target.as_str())
                    .await;
                (edge, started.elapsed(), result)
            })
            .buffered(self.in_flight());

        while let Some((edge, latency, result)) = results.next().await {
            processed += 1;
            match result {
                Ok(()) => latencies.push(latency),
                Err(e) => {
                    warn!(
                        "Failed to add edge {} -> {}: {}",
                        edge.source, edge.target, e
                    );
                    if !e.is_transport() {
                        latencies.push(latency);
                    }
                    failures.record(e.kind());
                }
            }

            if interval > 0 && processed % interval == 0 {
                let now = Instant::now();
                let sample = TimingSample::new(BUILD_PROGRESS_LABEL, now - last, processed);
                self.reporter.progress(&sample);
                checkpoints.push(sample);
                last = now;
            }
        }

        let report = BuildReport {
            backend: adapter.name().to_string(),
            edges_attempted: processed,
            edges_failed: failures.total(),
            failures,
            duration: start.elapsed(),
            checkpoints,
            latency: LatencyStats::from_durations(latencies),
        };
        self.reporter.summarize_build(&report);

        Ok(report)
    }
}
