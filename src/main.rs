use anyhow::Context;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::CorsLayer;

use makan_api::{
    config::Config,
    db,
    routes::{create_router, AppState},
    services::{RecommendationEngine, SqliteCatalog},
    telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    telemetry::init_tracing(&config.log_level);

    let engine_config = config
        .engine_config()
        .context("Invalid recommendation engine configuration")?;

    let pool = db::create_pool(&config.database_url, config.database_max_connections).await?;
    db::run_migrations(&pool).await?;
    if config.seed_catalog {
        db::seed_catalog(&pool).await?;
    }

    let state = AppState::new(
        Arc::new(SqliteCatalog::new(pool)),
        RecommendationEngine::new(engine_config),
    );

    let mut app = create_router(Arc::new(state));
    if config.enable_cors {
        app = app.layer(CorsLayer::permissive());
    }

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!(%error, "Failed to listen for ^C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received ^C, shutting down"),
        () = terminate => tracing::info!("Received terminate signal, shutting down"),
    }
}
