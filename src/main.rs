//! AgentMart Server: agent marketplace listing and review service.
//!
//! Main entry point that loads configuration, prepares the database, and
//! starts the HTTP server.

use tracing_subscriber::{EnvFilter, fmt};

use agentmart_core::config::AppConfig;
use agentmart_core::error::AppError;
use agentmart_database::DatabasePool;
use agentmart_database::migration;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("AGENTMART_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    let env = std::env::var("AGENTMART_ENV").unwrap_or_else(|_| "development".to_string());

    AppConfig::load(&config_path, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting AgentMart v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection ──────────────────────────────
    let db = DatabasePool::connect(&config.database).await?;

    // ── Step 2: Migrations ───────────────────────────────────────
    if config.database.auto_migrate {
        migration::run_migrations(db.pool()).await?;
    } else {
        tracing::info!("Automatic migrations disabled");
    }

    // ── Step 3: HTTP server ──────────────────────────────────────
    agentmart_api::run_server(config, db).await?;

    tracing::info!("AgentMart server shut down gracefully");
    Ok(())
}
