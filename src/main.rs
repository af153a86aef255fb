use std::env;
use std::sync::Arc;

use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use hrms_engine::api::{create_router, AppState};
use hrms_engine::clock::SystemClock;
use hrms_engine::config::ConfigLoader;
use hrms_engine::db;
use hrms_engine::scheduler::LeaveScheduler;

const DEFAULT_CONFIG_DIR: &str = "./config/default";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Environment may also be set externally.
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_dir = env::var("HRMS_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let config = ConfigLoader::load(&config_dir)
        .inspect(|_| info!(config_dir = %config_dir, "Configuration loaded"))
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    let database_url = db::database_url();
    let conn = db::setup(&database_url, &config)
        .await
        .inspect(|_| info!("Database initialized and seeded"))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    let clock = Arc::new(SystemClock::new(config.office_offset()));
    let state = AppState::new(conn, config, clock);

    LeaveScheduler::new(state.clone()).spawn();

    let bind_addr = env::var("HRMS_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .inspect_err(|e| error!("Failed to bind {}: {}", bind_addr, e))?;
    info!(addr = %bind_addr, "HRMS API listening");

    axum::serve(listener, create_router(state)).await?;
    Ok(())
}
