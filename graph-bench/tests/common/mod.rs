//! Shared fixtures for the integration tests: an in-memory backend with
//! failure injection, and an in-process HTTP graph service.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use graph_bench::{BackendAdapter, BackendError, Degrees};

type Adjacency = HashMap<String, HashSet<String>>;

/// Breadth-first search over `adjacency`. `None` when no path exists.
pub fn bfs(adjacency: &Adjacency, from: &str, to: &str) -> Option<u64> {
    if from == to {
        return Some(0);
    }
    let mut visited: HashSet<&str> = HashSet::from([from]);
    let mut queue = VecDeque::from([(from, 0u64)]);
    while let Some((vertex, depth)) = queue.pop_front() {
        for next in adjacency.get(vertex).into_iter().flatten() {
            if next == to {
                return Some(depth + 1);
            }
            if visited.insert(next.as_str()) {
                queue.push_back((next.as_str(), depth + 1));
            }
        }
    }
    None
}

#[derive(Default)]
struct MemoryState {
    adjacency: Adjacency,
    reset_calls: usize,
    add_edge_calls: usize,
    query_calls: usize,
    in_flight: usize,
    max_in_flight: usize,
}

/// In-memory backend with optional failure injection.
#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
    symmetric: bool,
    fail_every: Option<usize>,
    reset_error: Option<BackendError>,
    query_error: Option<BackendError>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store every edge in both directions.
    pub fn symmetric() -> Self {
        Self {
            symmetric: true,
            ..Self::default()
        }
    }

    /// Every `n`th `add_edge` call fails with a connection error.
    pub fn failing_every(n: usize) -> Self {
        Self {
            fail_every: Some(n),
            ..Self::default()
        }
    }

    pub fn with_reset_error(error: BackendError) -> Self {
        Self {
            reset_error: Some(error),
            ..Self::default()
        }
    }

    pub fn with_query_error(error: BackendError) -> Self {
        Self {
            query_error: Some(error),
            ..Self::default()
        }
    }

    pub fn reset_calls(&self) -> usize {
        self.state.lock().unwrap().reset_calls
    }

    pub fn add_edge_calls(&self) -> usize {
        self.state.lock().unwrap().add_edge_calls
    }

    pub fn query_calls(&self) -> usize {
        self.state.lock().unwrap().query_calls
    }

    pub fn max_in_flight(&self) -> usize {
        self.state.lock().unwrap().max_in_flight
    }

    pub fn edge_count(&self) -> usize {
        self.state
            .lock()
            .unwrap()
            .adjacency
            .values()
            .map(|targets| targets.len())
            .sum()
    }

    fn enter(&self) {
        let mut state = self.state.lock().unwrap();
        state.in_flight += 1;
        state.max_in_flight = state.max_in_flight.max(state.in_flight);
    }

    fn leave(&self) {
        self.state.lock().unwrap().in_flight -= 1;
    }
}

#[async_trait]
impl BackendAdapter for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    async fn reset(&self) -> Result<(), BackendError> {
        let mut state = self.state.lock().unwrap();
        state.reset_calls += 1;
        if let Some(e) = &self.reset_error {
            return Err(e.clone());
        }
        state.adjacency.clear();
        Ok(())
    }

    async fn add_edge(&self, v1: &str, v2: &str) -> Result<(), BackendError> {
        self.enter();
        tokio::task::yield_now().await;
        self.leave();

        let mut state = self.state.lock().unwrap();
        state.add_edge_calls += 1;
        if let Some(n) = self.fail_every {
            if state.add_edge_calls % n == 0 {
                return Err(BackendError::connection("connection reset by peer"));
            }
        }
        state.adjacency.entry(v2.to_string()).or_default();
        state
            .adjacency
            .entry(v1.to_string())
            .or_default()
            .insert(v2.to_string());
        if self.symmetric {
            state
                .adjacency
                .entry(v2.to_string())
                .or_default()
                .insert(v1.to_string());
        }
        Ok(())
    }

    async fn shortest_path_length(&self, v1: &str, v2: &str) -> Result<Degrees, BackendError> {
        self.enter();
        tokio::task::yield_now().await;
        self.leave();

        let mut state = self.state.lock().unwrap();
        state.query_calls += 1;
        if let Some(e) = &self.query_error {
            return Err(e.clone());
        }
        for v in [v1, v2] {
            if !state.adjacency.contains_key(v) {
                return Err(BackendError::not_found(v));
            }
        }
        Ok(match bfs(&state.adjacency, v1, v2) {
            Some(n) => Degrees::Path(n),
            None => Degrees::NoPath,
        })
    }
}

// ============================================================================
// In-process HTTP graph service
// ============================================================================

#[derive(Clone)]
struct ServiceState {
    adjacency: Arc<Mutex<Adjacency>>,
    delay: Duration,
}

type Params = Query<HashMap<String, String>>;

fn endpoints(params: &HashMap<String, String>) -> Result<(String, String), (StatusCode, String)> {
    match (params.get("v1"), params.get("v2")) {
        (Some(v1), Some(v2)) => Ok((v1.clone(), v2.clone())),
        _ => Err((StatusCode::BAD_REQUEST, "v1 and v2 are required".to_string())),
    }
}

async fn recon(State(state): State<ServiceState>) -> StatusCode {
    state.adjacency.lock().unwrap().clear();
    StatusCode::OK
}

async fn add_edge(
    State(state): State<ServiceState>,
    Query(params): Params,
) -> Result<StatusCode, (StatusCode, String)> {
    let (v1, v2) = endpoints(&params)?;
    let mut adjacency = state.adjacency.lock().unwrap();
    adjacency.entry(v2.clone()).or_default();
    adjacency.entry(v1).or_default().insert(v2);
    Ok(StatusCode::OK)
}

async fn get_degrees(
    State(state): State<ServiceState>,
    Query(params): Params,
) -> (StatusCode, String) {
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    let (v1, v2) = match endpoints(&params) {
        Ok(pair) => pair,
        Err(rejection) => return rejection,
    };
    let adjacency = state.adjacency.lock().unwrap();
    if !adjacency.contains_key(&v1) || !adjacency.contains_key(&v2) {
        return (StatusCode::NOT_FOUND, "key not found".to_string());
    }
    let degrees = bfs(&adjacency, &v1, &v2).unwrap_or(1_000_000_000_000);
    (StatusCode::OK, degrees.to_string())
}

/// Start a graph service on an ephemeral port and return its base URL.
///
/// `get-degrees` sleeps for `delay` before answering.
pub async fn spawn_graph_service(delay: Duration) -> String {
    let state = ServiceState {
        adjacency: Arc::new(Mutex::new(HashMap::new())),
        delay,
    };
    let app = Router::new()
        .route("/graph/recon", post(recon))
        .route("/graph/add-edge", post(add_edge))
        .route("/graph/get-degrees", post(get_degrees))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Start a server that has no routes at all, so every request gets a bare 404.
pub async fn spawn_empty_service() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, Router::new()).await.unwrap();
    });

    format!("http://{}", addr)
}

/// A base URL nothing is listening on.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
