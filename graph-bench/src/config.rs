// Run configuration, read from the environment (and `.env` via dotenv)
use std::str::FromStr;
use std::time::Duration;

use crate::errors::ConfigError;
use crate::generator::DEFAULT_VERTEX_PREFIX;
use crate::runner::{default_progress_interval, RunnerConfig, DEFAULT_QUERY_SAMPLES};

pub const DEFAULT_GRAPH_SERVICE_URL: &str = "http://0.0.0.0:9000";
pub const DEFAULT_NEO4J_URI: &str = "neo4j://localhost:7687";
pub const DEFAULT_NEO4J_USER: &str = "neo4j";
pub const DEFAULT_VERTEX_COUNT: usize = 500;
pub const DEFAULT_AVG_DEGREE: usize = 10;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5000;

/// Which backends a run drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Http,
    Neo4j,
    Both,
}

impl BackendKind {
    pub fn includes_http(&self) -> bool {
        matches!(self, BackendKind::Http | BackendKind::Both)
    }

    pub fn includes_neo4j(&self) -> bool {
        matches!(self, BackendKind::Neo4j | BackendKind::Both)
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" => Ok(BackendKind::Http),
            "neo4j" => Ok(BackendKind::Neo4j),
            "both" => Ok(BackendKind::Both),
            _ => Err("expected one of http, neo4j, both".to_string()),
        }
    }
}

/// Which phases a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchmarkMode {
    Build,
    Query,
    Both,
}

impl BenchmarkMode {
    pub fn runs_build(&self) -> bool {
        matches!(self, BenchmarkMode::Build | BenchmarkMode::Both)
    }

    pub fn runs_query(&self) -> bool {
        matches!(self, BenchmarkMode::Query | BenchmarkMode::Both)
    }
}

impl FromStr for BenchmarkMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "build" => Ok(BenchmarkMode::Build),
            "query" => Ok(BenchmarkMode::Query),
            "both" => Ok(BenchmarkMode::Both),
            _ => Err("expected one of build, query, both".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    pub backend: BackendKind,
    pub mode: BenchmarkMode,
    pub graph_service_url: String,
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,
    pub vertex_count: usize,
    pub avg_degree: usize,
    pub vertex_prefix: String,
    pub query_samples: usize,
    /// `None` picks an interval from the generated edge count.
    pub progress_interval: Option<usize>,
    pub request_timeout: Duration,
    pub seed: Option<u64>,
    pub concurrency: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Http,
            mode: BenchmarkMode::Both,
            graph_service_url: DEFAULT_GRAPH_SERVICE_URL.to_string(),
            neo4j_uri: DEFAULT_NEO4J_URI.to_string(),
            neo4j_user: DEFAULT_NEO4J_USER.to_string(),
            neo4j_password: String::new(),
            vertex_count: DEFAULT_VERTEX_COUNT,
            avg_degree: DEFAULT_AVG_DEGREE,
            vertex_prefix: DEFAULT_VERTEX_PREFIX.to_string(),
            query_samples: DEFAULT_QUERY_SAMPLES,
            progress_interval: None,
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            seed: None,
            concurrency: 1,
        }
    }
}

impl BenchConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Unset keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let concurrency = parse_or(&get, "BENCHMARK_CONCURRENCY", defaults.concurrency)?;
        if concurrency == 0 {
            return Err(ConfigError::invalid(
                "BENCHMARK_CONCURRENCY",
                "0",
                "must be at least 1",
            ));
        }

        let vertex_count = parse_or(&get, "VERTEX_COUNT", defaults.vertex_count)?;
        if vertex_count == 0 {
            return Err(ConfigError::invalid(
                "VERTEX_COUNT",
                "0",
                "must be at least 1",
            ));
        }

        let timeout_ms = parse_or(&get, "REQUEST_TIMEOUT_MS", DEFAULT_REQUEST_TIMEOUT_MS)?;

        Ok(Self {
            backend: parse_or(&get, "GRAPH_BACKEND", defaults.backend)?,
            mode: parse_or(&get, "BENCHMARK_MODE", defaults.mode)?,
            graph_service_url: get("GRAPH_SERVICE_URL").unwrap_or(defaults.graph_service_url),
            neo4j_uri: get("NEO4J_URI").unwrap_or(defaults.neo4j_uri),
            neo4j_user: get("NEO4J_USER").unwrap_or(defaults.neo4j_user),
            neo4j_password: lookup("NEO4J_PASSWORD").unwrap_or(defaults.neo4j_password),
            vertex_count,
            avg_degree: parse_or(&get, "AVG_DEGREE", defaults.avg_degree)?,
            vertex_prefix: get("VERTEX_PREFIX").unwrap_or(defaults.vertex_prefix),
            query_samples: parse_or(&get, "QUERY_SAMPLES", defaults.query_samples)?,
            progress_interval: get("PROGRESS_INTERVAL")
                .map(|v| parse_value("PROGRESS_INTERVAL", &v))
                .transpose()?,
            request_timeout: Duration::from_millis(timeout_ms),
            seed: get("BENCHMARK_SEED")
                .map(|v| parse_value("BENCHMARK_SEED", &v))
                .transpose()?,
            concurrency,
        })
    }

    /// Runner settings for a graph with `edge_count` edges.
    pub fn runner_config(&self, edge_count: usize) -> RunnerConfig {
        RunnerConfig {
            progress_interval: self
                .progress_interval
                .unwrap_or_else(|| default_progress_interval(edge_count)),
            query_samples: self.query_samples,
            concurrency: self.concurrency,
        }
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(value) => parse_value(key, &value),
        None => Ok(default),
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::invalid(key, value, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<BenchConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BenchConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, BenchConfig::default());
        assert_eq!(config.vertex_count, 500);
        assert_eq!(config.avg_degree, 10);
        assert_eq!(config.query_samples, 100);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("GRAPH_BACKEND", "Neo4j"),
            ("BENCHMARK_MODE", "query"),
            ("VERTEX_COUNT", "10"),
            ("AVG_DEGREE", "3"),
            ("PROGRESS_INTERVAL", "100"),
            ("REQUEST_TIMEOUT_MS", "250"),
            ("BENCHMARK_SEED", "42"),
            ("BENCHMARK_CONCURRENCY", "4"),
            ("NEO4J_PASSWORD", "12345678"),
        ])
        .unwrap();

        assert_eq!(config.backend, BackendKind::Neo4j);
        assert!(!config.mode.runs_build());
        assert!(config.mode.runs_query());
        assert_eq!(config.vertex_count, 10);
        assert_eq!(config.request_timeout, Duration::from_millis(250));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.neo4j_password, "12345678");

        let runner = config.runner_config(50_000);
        assert_eq!(runner.progress_interval, 100);
        assert_eq!(runner.concurrency, 4);
    }

    #[test]
    fn test_unset_progress_interval_follows_run_size() {
        let config = load(&[("VERTEX_COUNT", "10")]).unwrap();
        assert_eq!(config.progress_interval, None);
        assert_eq!(config.runner_config(27).progress_interval, 100);
        assert_eq!(config.runner_config(4800).progress_interval, 1000);

        let config = load(&[("PROGRESS_INTERVAL", "250")]).unwrap();
        assert_eq!(config.runner_config(27).progress_interval, 250);
        assert_eq!(config.runner_config(4800).progress_interval, 250);
    }

    #[test]
    fn test_invalid_number() {
        let err = load(&[("AVG_DEGREE", "-1")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "AVG_DEGREE"));
    }

    #[test]
    fn test_unknown_backend() {
        let err = load(&[("GRAPH_BACKEND", "postgres")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "GRAPH_BACKEND"));
    }

    #[test]
    fn test_zero_values_rejected() {
        assert!(load(&[("BENCHMARK_CONCURRENCY", "0")]).is_err());
        assert!(load(&[("VERTEX_COUNT", "0")]).is_err());
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = load(&[("VERTEX_COUNT", "  "), ("GRAPH_SERVICE_URL", "")]).unwrap();
        assert_eq!(config.vertex_count, DEFAULT_VERTEX_COUNT);
        assert_eq!(config.graph_service_url, DEFAULT_GRAPH_SERVICE_URL);
    }
}
