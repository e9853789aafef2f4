// Neo4j connection setup
use anyhow::{Context, Result};
use neo4rs::Graph;

/// Connect to Neo4j and return a Graph instance
pub fn connect(uri: &str, user: &str, password: &str) -> Result<Graph> {
    let graph = Graph::new(uri, user, password)
        .with_context(|| format!("Failed to connect to Neo4j at {}", uri))?;

    Ok(graph)
}
