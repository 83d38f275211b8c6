use anyhow::Result;
use eyesedge::api::rest::{AppState, RestApi};
use eyesedge::config::{self, StorageBackend};
use eyesedge::db::{seed, DatabaseService, Stores};
use eyesedge::services::Services;
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;

/// First CLI argument, else `EYESEDGE_CONFIG`
fn config_path() -> Option<PathBuf> {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var("EYESEDGE_CONFIG").ok())
        .map(PathBuf::from)
}

async fn run_app() -> Result<()> {
    let config = config::load_config(config_path().as_deref())?;

    // Initialize logging; RUST_LOG still wins over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.api.log_level.as_str()),
    )
    .init();
    info!("Starting eyesedge record service");
    info!("Configuration loaded");

    let (stores, database) = match config.database.backend {
        StorageBackend::Postgres => {
            let database = Arc::new(DatabaseService::new(&config.database).await?);
            (database.stores(), Some(database))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; records are lost on exit");
            (Stores::memory(), None)
        }
    };

    let services = Services::new(stores);

    if config.database.seed_example_data {
        let created = seed::seed_example_data(&services).await?;
        info!("Example data seeding created {} cameras", created);
    }

    let http_server = RestApi::new(&config.api, AppState::new(services, database));
    http_server.run().await?;

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run_app().await {
        eprintln!("Application error: {:#}", e);
        std::process::exit(1);
    }
}
