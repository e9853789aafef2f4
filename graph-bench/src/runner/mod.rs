//! Benchmark phases: bulk edge insertion ("build") and random shortest-path
//! queries ("query"). Both phases are independent and can run alone.
//!
//! Calls are issued strictly one at a time unless
//! [`RunnerConfig::concurrency`] is raised, in which case at most that many
//! adapter calls are in flight.
mod build;
mod query;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::reporter::Reporter;

pub const DEFAULT_PROGRESS_INTERVAL: usize = 1000;

/// Checkpoint interval for runs with fewer edges than [`DEFAULT_PROGRESS_INTERVAL`].
pub const SMALL_RUN_PROGRESS_INTERVAL: usize = 100;
pub const DEFAULT_QUERY_SAMPLES: usize = 100;

/// How often a self-pair is redrawn before the sample is skipped.
pub const MAX_SELF_PAIR_REDRAWS: usize = 16;

/// Consecutive transport failures after which a query phase is flagged.
pub const SYSTEMIC_FAILURE_THRESHOLD: usize = 10;

pub const BUILD_PROGRESS_LABEL: &str = "build.progress";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Edges between progress checkpoints; 0 disables checkpoints.
    pub progress_interval: usize,
    pub query_samples: usize,
    /// Maximum adapter calls in flight. 1 means strictly sequential.
    pub concurrency: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            query_samples: DEFAULT_QUERY_SAMPLES,
            concurrency: 1,
        }
    }
}

/// Progress interval to use when none is configured: 100 when the graph has
/// fewer edges than one default interval, 1000 otherwise.
pub fn default_progress_interval(edge_count: usize) -> usize {
    if edge_count < DEFAULT_PROGRESS_INTERVAL {
        SMALL_RUN_PROGRESS_INTERVAL
    } else {
        DEFAULT_PROGRESS_INTERVAL
    }
}

pub struct BenchmarkRunner<R = StdRng> {
    config: RunnerConfig,
    rng: R,
    reporter: Reporter,
}

impl BenchmarkRunner<StdRng> {
    pub fn seeded(config: RunnerConfig, seed: u64) -> Self {
        Self::new(config, StdRng::seed_from_u64(seed), Reporter::new())
    }

    pub fn from_entropy(config: RunnerConfig) -> Self {
        Self::new(config, StdRng::from_entropy(), Reporter::new())
    }
}

impl<R: Rng> BenchmarkRunner<R> {
    pub fn new(config: RunnerConfig, rng: R, reporter: Reporter) -> Self {
        Self {
            config,
            rng,
            reporter,
        }
    }

    pub fn with_reporter(mut self, reporter: Reporter) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    fn in_flight(&self) -> usize {
        self.config.concurrency.max(1)
    }
}
