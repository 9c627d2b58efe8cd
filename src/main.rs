use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use datasource_api::config::AppConfig;
use datasource_api::database::{DataSourceStore, DatabaseManager, MemoryDataSourceStore, PgDataSourceStore};
use datasource_api::{app, AppState};

#[derive(Parser, Debug)]
#[command(name = "datasource-api", version, about = "Data source registry HTTP service")]
struct Cli {
    /// Listen port (overrides API_PORT / PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Keep records in process memory instead of Postgres
    #[arg(long)]
    memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Some(port) = cli.port {
        config.api.port = port;
    }
    tracing::info!("Starting Data Source API in {:?} mode", config.environment);

    let pool = if cli.memory {
        None
    } else {
        let pool = DatabaseManager::connect(&config.database)
            .await
            .context("failed to connect to the database")?;
        Some(pool)
    };

    let store: Arc<dyn DataSourceStore> = match &pool {
        Some(pool) => Arc::new(PgDataSourceStore::new(pool.clone())),
        None => {
            tracing::warn!("Using in-memory storage; records are lost on exit");
            Arc::new(MemoryDataSourceStore::new())
        }
    };

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let app = app(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Data Source API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(pool) = pool {
        DatabaseManager::close(&pool).await;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
