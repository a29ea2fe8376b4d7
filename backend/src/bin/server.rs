//! Cadenza HTTP Server Binary
//!
//! This is the main entry point for the booking platform's REST API server.
//! It initializes the repository, sets up the HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Run with local (in-memory) repository (default)
//! cargo run --bin cadenza-server --features "local-repo,http-server"
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `CADENZA_REPOSITORY`: Repository backend (default: local)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use cadenza::checkout::SimulatedGateway;
use cadenza::db;
use cadenza::db::RepositoryConfig;
use cadenza::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
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

    info!("Starting Cadenza HTTP Server");

    // Initialize global repository once and reuse it across the app
    db::init_repository().map_err(|e| anyhow::anyhow!(e))?;
    let repository = Arc::clone(db::get_repository()?);
    info!("Repository initialized successfully");

    // Pricing comes from cadenza.toml when present, defaults otherwise
    let pricing = RepositoryConfig::from_default_location()
        .map(|config| config.pricing)
        .unwrap_or_default();
    info!(
        "Lesson pricing: {} cents per minute",
        pricing.per_minute_cents
    );

    // Create application state with the simulated payment gateway
    let gateway = Arc::new(SimulatedGateway::new());
    let state = AppState::new(repository, gateway, pricing);

    // Create router with all endpoints
    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);
    info!("API documentation: http://{}/health", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// Repository initialization is handled by `db::init_repository()`.
