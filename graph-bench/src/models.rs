// Data models shared by the generator, runner and reporter
use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::errors::{BackendError, FailureKind};
use crate::reporter::LatencyStats;

/// A named graph vertex. The name is `prefix + index`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Vertex {
    pub index: usize,
    pub name: String,
}

impl Vertex {
    pub fn new(prefix: &str, index: usize) -> Self {
        Self {
            index,
            name: format!("{}{}", prefix, index),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A forward edge: `source.index < target.index` always holds for generated edges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Edge {
    pub source: Vertex,
    pub target: Vertex,
}

/// In-memory graph used to drive a backend for the length of one run.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Successful answer to a shortest-path query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Degrees {
    /// Path length in edges.
    Path(u64),
    NoPath,
}

/// A single timing measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingSample {
    pub label: &'static str,
    pub duration: Duration,
    pub index: usize,
}

impl TimingSample {
    pub fn new(label: &'static str, duration: Duration, index: usize) -> Self {
        Self {
            label,
            duration,
            index,
        }
    }
}

/// Per-kind failure counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FailureCounts {
    pub connection: usize,
    pub backend: usize,
    pub timeout: usize,
    pub not_found: usize,
}

impl FailureCounts {
    pub fn record(&mut self, kind: FailureKind) {
        match kind {
            FailureKind::Connection => self.connection += 1,
            FailureKind::Backend => self.backend += 1,
            FailureKind::Timeout => self.timeout += 1,
            FailureKind::NotFound => self.not_found += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.connection + self.backend + self.timeout + self.not_found
    }
}

/// Summary of a build phase.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub backend: String,
    pub edges_attempted: usize,
    pub edges_failed: usize,
    pub failures: FailureCounts,
    pub duration: Duration,
    pub checkpoints: Vec<TimingSample>,
    pub latency: Option<LatencyStats>,
}

impl BuildReport {
    pub fn edges_succeeded(&self) -> usize {
        self.edges_attempted - self.edges_failed
    }

    /// Mean wall-clock time per attempted edge.
    pub fn per_edge(&self) -> Option<Duration> {
        mean_per(self.duration, self.edges_attempted)
    }
}

fn mean_per(total: Duration, count: usize) -> Option<Duration> {
    if count == 0 {
        return None;
    }
    Some(Duration::from_secs_f64(total.as_secs_f64() / count as f64))
}

/// Result of one query-phase sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum QueryOutcome {
    Distance(u64),
    NoPath,
    NotFound,
    /// No backend call was issued (self-pair that could not be redrawn).
    Skipped,
    Failed { kind: String, message: String },
}

impl QueryOutcome {
    pub fn from_result(result: &Result<Degrees, BackendError>) -> Self {
        match result {
            Ok(Degrees::Path(n)) => Self::Distance(*n),
            Ok(Degrees::NoPath) => Self::NoPath,
            Err(BackendError::NotFound(_)) => Self::NotFound,
            Err(e) => Self::Failed {
                kind: e.kind().to_string(),
                message: e.to_string(),
            },
        }
    }
}

impl fmt::Display for QueryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryOutcome::Distance(n) => write!(f, "{}", n),
            QueryOutcome::NoPath => f.write_str("unreachable"),
            QueryOutcome::NotFound => f.write_str("not found"),
            QueryOutcome::Skipped => f.write_str("skipped"),
            QueryOutcome::Failed { message, .. } => write!(f, "error ({})", message),
        }
    }
}

/// One query-phase sample.
#[derive(Debug, Clone, Serialize)]
pub struct QuerySample {
    pub index: usize,
    pub v1: String,
    pub v2: String,
    pub outcome: QueryOutcome,
    /// Zero for skipped samples.
    pub latency: Duration,
}

/// Summary of a query phase.
#[derive(Debug, Clone, Serialize)]
pub struct QueryReport {
    pub backend: String,
    pub samples: Vec<QuerySample>,
    pub duration: Duration,
    pub failures: FailureCounts,
    pub latency: Option<LatencyStats>,
    /// Set when the backend looked systemically unavailable during the phase.
    pub warning: Option<String>,
}

impl QueryReport {
    /// Samples for which a backend call was actually issued.
    pub fn issued(&self) -> usize {
        self.samples
            .iter()
            .filter(|s| s.outcome != QueryOutcome::Skipped)
            .count()
    }

    pub fn answered(&self) -> usize {
        self.count(|o| matches!(o, QueryOutcome::Distance(_)))
    }

    pub fn no_path(&self) -> usize {
        self.count(|o| matches!(o, QueryOutcome::NoPath))
    }

    pub fn not_found(&self) -> usize {
        self.count(|o| matches!(o, QueryOutcome::NotFound))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, QueryOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, QueryOutcome::Failed { .. }))
    }

    /// Mean wall-clock time per issued query.
    pub fn per_query(&self) -> Option<Duration> {
        mean_per(self.duration, self.issued())
    }

    fn count(&self, pred: impl Fn(&QueryOutcome) -> bool) -> usize {
        self.samples.iter().filter(|s| pred(&s.outcome)).count()
    }
}
