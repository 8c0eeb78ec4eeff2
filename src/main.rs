use murus::common::ApplicationError;
use murus::Config;
use std::error::Error;
use std::sync::Arc;
use tracing::{error, info, warn};

use murus::adapters::outbound::SqliteTrajectoryStore;
use murus::application::TrajectoryService;
use murus::domains::coverage::{GenerateRequest, Obstacle};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Murus trajectory service");

    // Load configuration
    let config = match Config::from_file("config.toml").await {
        Ok(config) => config,
        Err(e) => {
            warn!(
                "{}; using defaults",
                ApplicationError::Configuration(e.context("failed to load config.toml"))
            );
            Config::default()
        }
    };

    info!("Database path: {}", config.database.path);
    info!(
        "Cache: ttl={}s, memo capacity={}, response capacity={}",
        config.cache.ttl_secs, config.cache.memo_capacity, config.cache.response_capacity
    );

    let store = Arc::new(SqliteTrajectoryStore::new(&config.database).await?);
    let service = TrajectoryService::new(store, &config.cache);

    // Demo: plan a small wall with one window cut-out (non-fatal)
    let demo = GenerateRequest {
        wall_width: 5.0,
        wall_height: 3.0,
        step: 0.25,
        obstacles: vec![Obstacle {
            x: 1.0,
            y: 1.0,
            width: 0.5,
            height: 0.5,
        }],
    };
    match service.generate(demo).await {
        Ok(r) => info!(
            "Generated demo trajectory {} with {} waypoints ({}% coverage)",
            r.id, r.path_length, r.coverage_percentage
        ),
        Err(e) => error!("Demo trajectory generation failed: {:?}", e),
    }

    info!("Murus started successfully");

    // Keep the service running
    tokio::signal::ctrl_c().await?;
    info!("Shutting down Murus");

    Ok(())
}
