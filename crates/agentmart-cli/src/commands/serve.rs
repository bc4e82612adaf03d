//! Start the AgentMart server.

use clap::Args;

use agentmart_core::config::AppConfig;
use agentmart_core::error::AppError;
use agentmart_database::migration;

use crate::output;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Skip database migrations on startup
    #[arg(long)]
    pub no_migrate: bool,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }

    println!("Starting AgentMart server...");
    output::print_kv("Host", &config.server.host);
    output::print_kv("Port", &config.server.port.to_string());

    let pool = super::create_db_pool(&config).await?;

    if config.database.auto_migrate && !args.no_migrate {
        println!("Running database migrations...");
        migration::run_migrations(pool.pool()).await?;
        output::print_success("Migrations applied.");
    }

    agentmart_api::run_server(config, pool).await
}
