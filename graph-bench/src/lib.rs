//! # Graph Bench
//!
//! Load generation and measurement harness for graph backends. A random
//! forward-edge graph is synthesized by [`GraphGenerator`], pushed into a
//! backend through a [`BackendAdapter`], and queried for degrees of
//! separation between random vertex pairs. Latencies are aggregated by the
//! [`Reporter`].
//!
//! Two adapters ship with the crate: [`HttpBackend`] for the REST graph
//! service and [`Neo4jBackend`] for a Neo4j database.
pub mod config;
pub mod errors;
pub mod generator;
pub mod http;
pub mod interfaces;
pub mod models;
pub mod neo4j;
pub mod reporter;
pub mod runner;

pub use config::{BackendKind, BenchConfig, BenchmarkMode};
pub use errors::{BackendError, ConfigError, FailureKind, GeneratorError};
pub use generator::GraphGenerator;
pub use http::HttpBackend;
pub use interfaces::BackendAdapter;
pub use models::{
    BuildReport, Degrees, Edge, FailureCounts, Graph, QueryOutcome, QueryReport, QuerySample,
    TimingSample, Vertex,
};
pub use neo4j::Neo4jBackend;
pub use reporter::{LatencyStats, Reporter};
pub use runner::{BenchmarkRunner, RunnerConfig};
