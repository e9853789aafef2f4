use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{info, warn};

use super::{BenchmarkRunner, MAX_SELF_PAIR_REDRAWS, SYSTEMIC_FAILURE_THRESHOLD};
use crate::errors::BackendError;
use crate::interfaces::BackendAdapter;
use crate::models::{FailureCounts, Graph, QueryOutcome, QueryReport, QuerySample, Vertex};
use crate::reporter::LatencyStats;

impl<R: Rng> BenchmarkRunner<R> {
    /// Query the shortest path between `query_samples` random vertex pairs.
    ///
    /// Pairs are drawn with replacement. A pair of identical vertices is
    /// redrawn; if no distinct pair turns up the sample is recorded as
    /// [`QueryOutcome::Skipped`] without calling the backend. Per-sample
    /// failures never abort the phase.
    pub async fn run_query(&mut self, graph: &Graph, adapter: &dyn BackendAdapter) -> QueryReport {
        let samples = self.config.query_samples;
        info!(
            backend = adapter.name(),
            samples, "Querying distance between random vertex pairs"
        );

        let pairs: Vec<Option<(&Vertex, &Vertex)>> = (0..samples)
            .map(|_| draw_pair(&mut self.rng, &graph.vertices))
            .collect();
        let reporter = self.reporter;

        let start = Instant::now();
        let results: Vec<(QuerySample, Option<BackendError>)> =
            stream::iter(pairs.into_iter().enumerate())
                .map(|(index, pair)| async move {
                    let Some((v1, v2)) = pair else {
                        let sample = QuerySample {
                            index,
                            v1: String::new(),
                            v2: String::new(),
                            outcome: QueryOutcome::Skipped,
                            latency: Duration::ZERO,
                        };
                        return (sample, None);
                    };

                    let started = Instant::now();
                    let result = adapter.shortest_path_length(v1.as_str(), v2.as_str()).await;
                    let latency = started.elapsed();
                    let outcome = QueryOutcome::from_result(&result);
                    reporter.query_sample(v1.as_str(), v2.as_str(), &outcome, latency);

                    let sample = QuerySample {
                        index,
                        v1: v1.name.clone(),
                        v2: v2.name.clone(),
                        outcome,
                        latency,
                    };
                    (sample, result.err())
                })
                .buffered(self.in_flight())
                .collect()
                .await;
        let duration = start.elapsed();

        let mut failures = FailureCounts::default();
        let mut latencies = Vec::with_capacity(results.len());
        let mut streak = 0;
        let mut longest_streak = 0;
        let mut transport_failures = 0;
        let mut issued = 0;

        let samples: Vec<QuerySample> = results
            .into_iter()
            .map(|(sample, error)| {
                if sample.outcome != QueryOutcome::Skipped {
                    issued += 1;
                }
                match &error {
                    Some(e) if e.is_transport() => {
                        transport_failures += 1;
                        streak += 1;
                        longest_streak = longest_streak.max(streak);
                    }
                    _ => {
                        streak = 0;
                        if sample.outcome != QueryOutcome::Skipped {
                            latencies.push(sample.latency);
                        }
                    }
                }
                if let Some(e) = &error {
                    failures.record(e.kind());
                }
                sample
            })
            .collect();

        let warning = systemic_warning(adapter.name(), issued, transport_failures, longest_streak);
        if let Some(w) = &warning {
            warn!("{}", w);
        }

        let report = QueryReport {
            backend: adapter.name().to_string(),
            samples,
            duration,
            failures,
            latency: LatencyStats::from_durations(latencies),
            warning,
        };
        self.reporter.summarize_query(&report);

        report
    }
}

fn draw_pair<'a, R: Rng>(rng: &mut R, vertices: &'a [Vertex]) -> Option<(&'a Vertex, &'a Vertex)> {
    for _ in 0..=MAX_SELF_PAIR_REDRAWS {
        let v1 = vertices.choose(rng)?;
        let v2 = vertices.choose(rng)?;
        if v1 != v2 {
            return Some((v1, v2));
        }
    }
    None
}

fn systemic_warning(
    backend: &str,
    issued: usize,
    transport_failures: usize,
    longest_streak: usize,
) -> Option<String> {
    if issued > 0 && transport_failures == issued {
        return Some(format!(
            "Backend {} unreachable: all {} queries failed at the transport level",
            backend, issued
        ));
    }
    if longest_streak >= SYSTEMIC_FAILURE_THRESHOLD {
        return Some(format!(
            "Backend {} looked unavailable: {} consecutive queries failed at the transport level ({} of {} overall)",
            backend, longest_streak, transport_failures, issued
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn vertices(n: usize) -> Vec<Vertex> {
        (0..n).map(|i| Vertex::new("ver", i)).collect()
    }

    #[test]
    fn test_draw_pair_never_returns_self_pair() {
        let mut rng = StdRng::seed_from_u64(5);
        let vs = vertices(3);
        for _ in 0..200 {
            let (a, b) = draw_pair(&mut rng, &vs).unwrap();
            assert_ne!(a, b);
        }
    }

    #[test]
    fn test_draw_pair_single_vertex_is_skipped() {
        let mut rng = StdRng::seed_from_u64(5);
        assert!(draw_pair(&mut rng, &vertices(1)).is_none());
        assert!(draw_pair(&mut rng, &[]).is_none());
    }

    #[test]
    fn test_systemic_warning_thresholds() {
        assert!(systemic_warning("http", 5, 5, 5).is_some());
        assert!(systemic_warning("http", 100, 10, 10).is_some());
        assert!(systemic_warning("http", 100, 9, 3).is_none());
        assert!(systemic_warning("http", 0, 0, 0).is_none());
    }
}
