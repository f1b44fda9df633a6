use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use weather_server::config::{Config, StoreBackend};
use weather_server::db::PgStore;
use weather_server::memory::MemoryStore;
use weather_server::store::ReadingStore;
use weather_server::{metrics, rest};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Starting weather server");
    info!("HTTP server: {}", config.http_addr);
    info!("Store backend: {}", config.backend);
    info!("Retention: {}", config.retention);
    info!("Display timezone: {}", config.display_zone);

    metrics::init_metrics();

    // Schema must exist before the first request is accepted
    let store: Arc<dyn ReadingStore> = match config.backend {
        StoreBackend::Postgres => {
            info!("Database: {}", config.database_host());
            match PgStore::connect(
                &config.database_url,
                config.db_max_connections,
                config.db_acquire_timeout,
                config.retention,
            )
            .await
            {
                Ok(store) => Arc::new(store),
                Err(e) => {
                    error!("Failed to initialize database: {}", e);
                    std::process::exit(1);
                }
            }
        }
        StoreBackend::Memory => Arc::new(MemoryStore::new(config.retention)),
    };

    let app = rest::create_router(store, config.display_zone);

    let listener = rest::bind(&config.http_addr).await.unwrap_or_else(|e| {
        error!("Failed to bind to {}: {}", config.http_addr, e);
        std::process::exit(1);
    });

    info!("HTTP server listening on {}", config.http_addr);

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap_or_else(|e| {
            error!("HTTP server error: {}", e);
        });
    });

    tokio::select! {
        _ = server_handle => {
            error!("HTTP server terminated");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    info!("Shutting down");
}
