use anyhow::{Context, Result};
use graph_bench::{
    neo4j, BackendAdapter, BenchConfig, BenchmarkRunner, GraphGenerator, HttpBackend,
    LatencyStats, Neo4jBackend, Reporter,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn make_runner(config: &BenchConfig, edge_count: usize) -> BenchmarkRunner {
    let runner_config = config.runner_config(edge_count);
    // Same seed per backend, so every backend is queried with the same pairs.
    match config.seed {
        Some(seed) => BenchmarkRunner::seeded(runner_config, seed.wrapping_add(1)),
        None => BenchmarkRunner::from_entropy(runner_config),
    }
}

async fn connect_backends(config: &BenchConfig) -> Result<Vec<Box<dyn BackendAdapter>>> {
    let mut backends: Vec<Box<dyn BackendAdapter>> = Vec::new();

    if config.backend.includes_http() {
        let backend = HttpBackend::new(&config.graph_service_url, config.request_timeout)
            .context("Failed to create HTTP graph client")?;
        backends.push(Box::new(backend));
    }

    if config.backend.includes_neo4j() {
        let backend = Neo4jBackend::connect(
            &config.neo4j_uri,
            &config.neo4j_user,
            &config.neo4j_password,
            config.request_timeout,
        )?;
        info!("✓ Connected to Neo4j");

        info!("=== Preparing Neo4j Schema ===");
        neo4j::create_constraints(backend.graph()).await?;
        if let Err(e) = neo4j::verify_indexes(backend.graph()).await {
            warn!("Failed to verify Neo4j indexes, continuing: {}", e);
        }
        backends.push(Box::new(backend));
    }

    Ok(backends)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config = BenchConfig::from_env().context("Invalid benchmark configuration")?;

    info!("╔════════════════════════════════════════════════════════════╗");
    info!("║          DEGREES OF SEPARATION BENCHMARK                   ║");
    info!("╚════════════════════════════════════════════════════════════╝");
    info!("Backend: {:?}", config.backend);
    info!("Mode: {:?}", config.mode);
    info!("Vertices: {}", config.vertex_count);
    info!("Average degree: {}", config.avg_degree);
    info!("Query samples: {}", config.query_samples);
    info!("Concurrency: {}", config.concurrency);
    if let Some(seed) = config.seed {
        info!("Seed: {}", seed);
    }

    let mut generator = match config.seed {
        Some(seed) => GraphGenerator::seeded(seed),
        None => GraphGenerator::from_entropy(),
    }
    .with_prefix(config.vertex_prefix.clone());
    let graph = generator
        .generate(config.vertex_count, config.avg_degree)
        .context("Failed to generate benchmark graph")?;
    info!("Number of edges: {}", graph.edge_count());

    let backends = connect_backends(&config).await?;

    let mut build_latency: Vec<(String, LatencyStats)> = Vec::new();
    let mut query_latency: Vec<(String, LatencyStats)> = Vec::new();

    for backend in &backends {
        let mut runner = make_runner(&config, graph.edge_count());
        info!("");
        info!("=== {} Benchmark ===", backend.name());

        if config.mode.runs_build() {
            match runner.run_build(&graph, backend.as_ref()).await {
                Ok(report) => {
                    if let Some(stats) = report.latency {
                        build_latency.push((report.backend, stats));
                    }
                }
                Err(e) => {
                    error!("Build phase aborted for {}: {}", backend.name(), e);
                    continue;
                }
            }
        }

        if config.mode.runs_query() {
            let report = runner.run_query(&graph, backend.as_ref()).await;
            if let Some(stats) = report.latency {
                query_latency.push((report.backend, stats));
            }
        }
    }

    let reporter = Reporter::new();
    for (operation, results) in [("add-edge", &build_latency), ("get-degrees", &query_latency)] {
        let ranked: Vec<(&str, &LatencyStats)> =
            results.iter().map(|(name, stats)| (name.as_str(), stats)).collect();
        reporter.compare(operation, &ranked);
    }

    info!("All benchmarks complete!");

    Ok(())
}
