use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use socialconnect_api::database::DatabaseManager;
use socialconnect_api::realtime::NotificationHub;
use socialconnect_api::state::AppState;
use socialconnect_api::{build_router, config, is_development};

#[derive(Parser)]
#[command(name = "socialconnect-api")]
#[command(about = "SocialConnect API server")]
#[command(version)]
struct Cli {
    #[arg(long, help = "Bind address (overrides SERVER_HOST)")]
    host: Option<String>,

    #[arg(long, help = "Listen port (overrides SERVER_PORT / PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Apply database migrations and exit")]
    migrate_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.default_log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting SocialConnect API in {:?} mode", config.environment);
    if is_development!() {
        tracing::warn!("Development preset active; do not expose this instance publicly");
    }

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    if config.database.run_migrations || cli.migrate_only {
        DatabaseManager::migrate(&pool).await.context("failed to run migrations")?;
    }

    if cli.migrate_only {
        DatabaseManager::close(&pool).await;
        return Ok(());
    }

    let state = AppState::new(pool.clone());
    let hub = state.hub.clone();
    let app = build_router(state);

    let host = cli.host.unwrap_or_else(|| config.server.host.clone());
    let port = cli.port.unwrap_or(config.server.port);
    let bind_addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("SocialConnect API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(hub))
        .await
        .context("server error")?;

    DatabaseManager::close(&pool).await;

    Ok(())
}

/// Resolves on ctrl-c or SIGTERM. Open SSE streams are closed here, otherwise
/// graceful shutdown would wait on them forever.
async fn shutdown_signal(hub: NotificationHub) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
    hub.unsubscribe_all().await;
}
