//! Catalog Cache - product catalog service with a read-through cache
//!
//! Serves product listings and lookups from a TTL-bounded in-memory cache
//! that is invalidated whenever a product is written.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_cache::api::create_router_with_origins;
use catalog_cache::backend::{default_catalog, InMemoryProductStore};
use catalog_cache::{spawn_sweeper_task, AppState, Config};

/// Main entry point for the catalog server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the product store, seeding it if configured
/// 4. Create the cache and catalog service
/// 5. Start the background sweeper
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting catalog server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, cache_ttl={}s, max_entries={}, sweep_interval={}s, cors_origins={:?}",
        config.server_port,
        config.cache_ttl,
        config.max_entries,
        config.sweep_interval,
        config.cors_origins
    );
    if config.admin_token.is_none() {
        warn!("ADMIN_TOKEN is not set, product write routes are open");
    }

    let store = Arc::new(InMemoryProductStore::new());
    if config.seed_products {
        store
            .seed(default_catalog())
            .await
            .context("failed to seed product store")?;
    }

    let state = AppState::from_config(&config, store);
    info!("Product cache initialized");

    let sweeper = if config.sweep_interval > 0 {
        let interval = Duration::from_secs(config.sweep_interval);
        Some(spawn_sweeper_task(state.catalog.cache(), interval))
    } else {
        info!("Cache sweeper disabled, expired entries are dropped on lookup");
        None
    };

    let app = create_router_with_origins(state, &config.cors_origins);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweeper))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the sweeper and allows graceful shutdown.
async fn shutdown_signal(sweeper: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = sweeper {
        handle.abort();
        warn!("Cache sweeper aborted");
    }
}
