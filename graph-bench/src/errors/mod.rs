//! Error types for the graph benchmark.
//!
//! Generation and configuration errors are fatal and abort a run before any
//! backend call. Backend errors are recorded per call and summarized at the
//! end of a phase.
mod backend;
mod config;
mod generator;

pub use backend::{BackendError, FailureKind};
pub use config::ConfigError;
pub use generator::GeneratorError;
