use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use media_hub_api::{
    config::{Config, StorageBackend, DEV_JWT_SECRET},
    create_router,
    db::{
        create_pool, create_redis_client, run_migrations, seed::seed_demo_data, Cache,
        ContentStore, MemoryContentStore, MemoryUserStore, PgContentStore, PgUserStore,
        UserStore,
    },
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "media_hub_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    if config.jwt_secret == DEV_JWT_SECRET {
        tracing::warn!("JWT_SECRET is not set, using the development secret");
    }

    let (content, users): (Arc<dyn ContentStore>, Arc<dyn UserStore>) = match config.storage {
        StorageBackend::Postgres => {
            let pool = create_pool(&config.database_url)
                .await
                .context("Failed to connect to PostgreSQL")?;
            run_migrations(&pool).await?;
            tracing::info!("Database ready");
            (
                Arc::new(PgContentStore::new(pool.clone())),
                Arc::new(PgUserStore::new(pool)),
            )
        }
        StorageBackend::Memory => {
            tracing::info!("Using in-memory storage");
            (
                Arc::new(MemoryContentStore::new()),
                Arc::new(MemoryUserStore::new()),
            )
        }
    };

    if config.seed_demo_data {
        seed_demo_data(content.as_ref(), users.as_ref()).await?;
    }

    let mut state = AppState::new(&config, content, users);

    let cache_handle = match &config.redis_url {
        Some(url) => {
            let client = create_redis_client(url)?;
            let (cache, handle) = Cache::new(client).await;
            state = state.with_cache(cache);
            tracing::info!("Redis cache enabled");
            Some(handle)
        }
        None => {
            tracing::info!("REDIS_URL not set, caching disabled");
            None
        }
    };

    let app = create_router(Arc::new(state));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_handle {
        handle.shutdown().await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
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
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
