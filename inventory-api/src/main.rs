//! # Inventory API Server
//!
//! HTTP backend for an inventory dashboard: users, a product catalog with
//! stock counts, and orders that decrement stock.
//!
//! ## Startup
//!
//! 1. Load configuration from the environment (and `.env`)
//! 2. Initialize tracing
//! 3. Connect the store; for PostgreSQL, create the pool and run migrations
//! 4. Build the router and serve until SIGINT/SIGTERM
//!
//! ## Usage
//!
//! ```bash
//! DB_USER=inventory DB_PASS=secret cargo run -p inventory-api
//! STORAGE_BACKEND=memory cargo run -p inventory-api
//! ```

use inventory_api::{
    app::{build_router, AppState},
    config::{Config, StorageBackend},
};
use inventory_shared::{
    db::{
        migrations::{get_migration_status, run_migrations},
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    store::{MemoryStore, PgStore, Store},
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Read .env before the filter so RUST_LOG can live there too
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inventory_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config.inspect_err(|e| tracing::error!(error = %e, "Invalid configuration"))?;

    tracing::info!(
        "Inventory API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let (store, pool) = connect_store(&config).await?;

    let addr = config.bind_address();
    let app = build_router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Inventory server is running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pool {
        close_pool(pool).await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Builds the configured store; the pool is returned so it can be closed
/// on shutdown
async fn connect_store(config: &Config) -> anyhow::Result<(Arc<dyn Store>, Option<PgPool>)> {
    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on exit");
            Ok((Arc::new(MemoryStore::new()), None))
        }
        StorageBackend::Postgres => {
            let database = config
                .storage
                .database
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("PostgreSQL storage requires database settings"))?;

            tracing::info!(
                user = database.user.as_deref().unwrap_or("<from DATABASE_URL>"),
                max_connections = database.max_connections,
                "Connecting to PostgreSQL"
            );

            let pool = create_pool(DatabaseConfig {
                url: database.url.clone(),
                max_connections: database.max_connections,
                ..Default::default()
            })
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Database connection failed"))?;

            run_migrations(&pool).await?;
            let status = get_migration_status(&pool).await?;
            tracing::info!(
                applied = status.applied_migrations,
                latest = ?status.latest_version,
                "Database migrations up to date"
            );

            Ok((Arc::new(PgStore::new(pool.clone())), Some(pool)))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
