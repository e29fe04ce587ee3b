//! Timetable HTTP Server Binary
//!
//! Main entry point for the timetable REST API server. Loads configuration,
//! builds the repository and the solver client, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # In-memory repository (default)
//! cargo run --bin timetable-server
//!
//! # JSON snapshot on disk, solver on another host
//! REPOSITORY_TYPE=file REPOSITORY_PATH=data/timetables.json \
//!   SOLVER_URL=http://solver:5001 cargo run --bin timetable-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `REPOSITORY_TYPE`: `local` or `file` (default: local)
//! - `REPOSITORY_PATH`: Snapshot path for the file repository
//! - `SOLVER_URL`: Base URL of the timetable solver (default: http://127.0.0.1:5001)
//! - `SOLVER_TIMEOUT_SECS`: Solver round-trip bound (default: 30)
//! - `RUST_LOG`: Log level (default: info)
//!
//! Values from `timetable.toml` are used when the variables are unset.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use timetable_rust::config::AppConfig;
use timetable_rust::db::RepositoryFactory;
use timetable_rust::http::{create_router, AppState};
use timetable_rust::services::{GenerationOrchestrator, HttpSolverClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging; `log` records from the library are forwarded too.
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting timetable HTTP server");

    let config = AppConfig::load().context("Failed to load configuration")?;

    let repository =
        RepositoryFactory::from_config(&config).context("Failed to initialize repository")?;
    info!("Repository initialized ({})", config.repository.repo_type);

    let solver = HttpSolverClient::new(&config.solver.url, config.solver.timeout())
        .context("Failed to build solver client")?;
    info!(
        "Solver endpoint {} (timeout {}s)",
        solver.endpoint(),
        config.solver.timeout_secs
    );

    let orchestrator =
        GenerationOrchestrator::new(Arc::new(solver), repository.clone(), config.solver.timeout());
    let app = create_router(AppState::new(repository, orchestrator));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid bind address")?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
