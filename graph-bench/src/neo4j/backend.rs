//! Neo4j implementation of [`BackendAdapter`].
//!
//! Writes go through explicit transactions (`start_txn` / `commit`), path
//! queries through `execute_read`. Every driver call is bounded by the
//! configured timeout.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use neo4rs::{Graph, Query, Row};
use tracing::info;

use super::queries::{CLEAR_GRAPH, MERGE_LINK, MERGE_VERTEX, SHORTEST_PATH, VERTEX_EXISTS};
use crate::errors::BackendError;
use crate::interfaces::BackendAdapter;
use crate::models::Degrees;

/// Adapter for a Neo4j database.
///
/// Edges are stored in both directions, so path lengths are symmetric.
pub struct Neo4jBackend {
    graph: Graph,
    timeout: Duration,
}

impl Neo4jBackend {
    pub fn new(graph: Graph, timeout: Duration) -> Self {
        Self { graph, timeout }
    }

    /// Connect and wrap the resulting handle.
    pub fn connect(
        uri: &str,
        user: &str,
        password: &str,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        info!("Connecting to Neo4j at {}", uri);
        let graph = super::connect(uri, user, password)?;
        Ok(Self::new(graph, timeout))
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, BackendError>
    where
        F: Future<Output = Result<T, neo4rs::Error>>,
    {
        bounded(self.timeout, fut).await
    }

    async fn write(&self, queries: Vec<Query>) -> Result<(), BackendError> {
        self.bounded(async {
            let mut txn = self.graph.start_txn().await?;
            for query in queries {
                txn.run(query).await?;
            }
            txn.commit().await?;
            Ok::<(), neo4rs::Error>(())
        })
        .await
    }

    async fn read_one(&self, query: Query) -> Result<Row, BackendError> {
        let row = self
            .bounded(async {
                let mut stream = self.graph.execute_read(query).await?;
                stream.next().await
            })
            .await?;
        row.ok_or_else(|| BackendError::backend("query returned no rows"))
    }
}

#[async_trait]
impl BackendAdapter for Neo4jBackend {
    fn name(&self) -> &str {
        "neo4j"
    }

    async fn reset(&self) -> Result<(), BackendError> {
        self.write(vec![Query::new(CLEAR_GRAPH.to_string())]).await
    }

    async fn add_edge(&self, v1: &str, v2: &str) -> Result<(), BackendError> {
        self.write(vec![
            Query::new(MERGE_VERTEX.to_string()).param("name", v1.to_string()),
            Query::new(MERGE_VERTEX.to_string()).param("name", v2.to_string()),
            Query::new(MERGE_LINK.to_string())
                .param("v1", v1.to_string())
                .param("v2", v2.to_string()),
        ])
        .await
    }

    async fn shortest_path_length(&self, v1: &str, v2: &str) -> Result<Degrees, BackendError> {
        if v1 == v2 {
            let row = self
                .read_one(Query::new(VERTEX_EXISTS.to_string()).param("v1", v1.to_string()))
                .await?;
            if !column::<bool>(&row, "has_v1")? {
                return Err(BackendError::not_found(v1));
            }
            return Ok(Degrees::Path(0));
        }

        let row = self
            .read_one(
                Query::new(SHORTEST_PATH.to_string())
                    .param("v1", v1.to_string())
                    .param("v2", v2.to_string()),
            )
            .await?;

        match (column::<bool>(&row, "has_v1")?, column::<bool>(&row, "has_v2")?) {
            (true, true) => {}
            (false, true) => return Err(BackendError::not_found(v1)),
            (true, false) => return Err(BackendError::not_found(v2)),
            (false, false) => return Err(BackendError::not_found(format!("{}, {}", v1, v2))),
        }

        match column::<Option<i64>>(&row, "degrees")? {
            Some(n) if n >= 0 => Ok(Degrees::Path(n as u64)),
            _ => Ok(Degrees::NoPath),
        }
    }
}

fn column<'a, T: serde::Deserialize<'a>>(row: &'a Row, key: &str) -> Result<T, BackendError> {
    row.get::<T>(key)
        .map_err(|e| BackendError::backend(format!("bad column {}: {}", key, e)))
}

/// Run a driver call with a deadline.
///
/// On timeout the driver future is dropped mid-call. neo4rs does not cancel
/// the server-side query: the pooled connection is only `RESET` when it is
/// recycled, so a response still in flight may be left unread on it. A run
/// that hits repeated timeouts should be treated as suspect and the pool
/// rebuilt by reconnecting.
async fn bounded<T, F>(timeout: Duration, fut: F) -> Result<T, BackendError>
where
    F: Future<Output = Result<T, neo4rs::Error>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result.map_err(classify),
        Err(_) => Err(BackendError::Timeout(timeout)),
    }
}

fn classify(err: neo4rs::Error) -> BackendError {
    match &err {
        neo4rs::Error::IOError { .. } | neo4rs::Error::ConnectionError => {
            BackendError::connection(err.to_string())
        }
        _ => BackendError::backend(err.to_string()),
    }
}
