//! Interfaces implemented by graph backends under benchmark.
mod backend;

pub use backend::BackendAdapter;
