// Neo4j schema setup for the benchmark graph
use anyhow::Result;
use neo4rs::{Graph, Query};
use tracing::{info, warn};

use super::queries::{CREATE_NAME_CONSTRAINT, SHOW_INDEXES};

/// Create the uniqueness constraint on Vertex.name (which also backs an index).
pub async fn create_constraints(graph: &Graph) -> Result<()> {
    info!("Creating unique constraint on Vertex.name...");
    match graph.run(Query::new(CREATE_NAME_CONSTRAINT.to_string())).await {
        Ok(_) => info!("✓ Created unique constraint on Vertex.name"),
        Err(e) => warn!(
            "Failed to create constraint on Vertex.name (may already exist): {}",
            e
        ),
    }

    Ok(())
}

/// Log how many indexes the database reports.
pub async fn verify_indexes(graph: &Graph) -> Result<usize> {
    let mut count = 0;
    match graph.execute(Query::new(SHOW_INDEXES.to_string())).await {
        Ok(mut result) => loop {
            match result.next().await {
                Ok(Some(_)) => count += 1,
                Ok(None) => {
                    info!("✓ Total indexes in database: {}", count);
                    break;
                }
                Err(e) => {
                    warn!("Stopped reading indexes after {}: {}", count, e);
                    break;
                }
            }
        },
        Err(e) => warn!("Could not verify indexes: {}", e),
    }

    if count == 0 {
        warn!("No indexes found! Vertex lookups will scan the whole graph.");
    }

    Ok(count)
}
