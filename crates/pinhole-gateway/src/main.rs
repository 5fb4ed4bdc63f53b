use std::sync::Arc;

use clap::Parser;
use jiff::SignedDuration;
use pinhole_core::Shortener;
use pinhole_gateway::cli::{StorageBackendArg, CLI};
use pinhole_gateway::{telemetry, App, AppState};
use pinhole_generator::RandomGenerator;
use pinhole_shortener::{MappingService, ServiceSettings};
use pinhole_storage::{InMemoryStore, RedbStore};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::try_parse()?;
    telemetry::init(config.log_json)?;

    info!(
        listen_addr = %config.listen_addr,
        public_base_url = %config.public_base_url,
        storage_backend = %config.storage,
        "starting gateway server"
    );

    let settings = ServiceSettings::builder()
        .max_generation_attempts(config.max_generation_attempts)
        .default_ttl(SignedDuration::from_hours(
            i64::from(config.default_ttl_days) * 24,
        ))
        .build();

    let shortener: Arc<dyn Shortener> = match config.storage {
        StorageBackendArg::InMemory => Arc::new(MappingService::new(
            InMemoryStore::new(),
            RandomGenerator::new(),
            settings,
        )),
        StorageBackendArg::Redb => {
            let store = RedbStore::open(&config.db_path)?;
            info!(db_path = %config.db_path.display(), "using redb storage");
            Arc::new(MappingService::new(store, RandomGenerator::new(), settings))
        }
    };

    let state = AppState::new(shortener, config.public_base_url);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
    }
}
