//! Random forward-edge graph synthesis.
//!
//! For every vertex `i` except the last, `avg_degree` targets are drawn
//! uniformly from `[i + 1, n - 1]`. Targets always sit above their source, so
//! the result is a DAG. Duplicate pairs collapse, which makes the final edge
//! count data-dependent and at most `n * avg_degree`.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::errors::GeneratorError;
use crate::models::{Edge, Graph, Vertex};

pub const DEFAULT_VERTEX_PREFIX: &str = "ver";

pub struct GraphGenerator<R = StdRng> {
    prefix: String,
    rng: R,
}

impl GraphGenerator<StdRng> {
    /// Reproducible generator: the same seed always yields the same edge set.
    pub fn seeded(seed: u64) -> Self {
        Self::new(DEFAULT_VERTEX_PREFIX, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(DEFAULT_VERTEX_PREFIX, StdRng::from_entropy())
    }
}

impl<R: Rng> GraphGenerator<R> {
    pub fn new(prefix: impl Into<String>, rng: R) -> Self {
        Self {
            prefix: prefix.into(),
            rng,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn generate(
        &mut self,
        vertex_count: usize,
        avg_degree: usize,
    ) -> Result<Graph, GeneratorError> {
        if vertex_count == 0 {
            return Err(GeneratorError::invalid_parameter(
                "vertex count must be at least 1",
            ));
        }
        if vertex_count.checked_mul(avg_degree).is_none() {
            return Err(GeneratorError::invalid_parameter(format!(
                "{} vertices with average degree {} overflows the edge count",
                vertex_count, avg_degree
            )));
        }

        let vertices: Vec<Vertex> = (0..vertex_count)
            .map(|i| Vertex::new(&self.prefix, i))
            .collect();

        let mut pairs = BTreeSet::new();
        for i in 0..vertex_count.saturating_sub(1) {
            for _ in 0..avg_degree {
                let target = self.rng.gen_range(i + 1..vertex_count);
                pairs.insert((i, target));
            }
        }

        let edges = pairs
            .into_iter()
            .map(|(s, t)| Edge {
                source: vertices[s].clone(),
                target: vertices[t].clone(),
            })
            .collect();

        Ok(Graph { vertices, edges })
    }
}
