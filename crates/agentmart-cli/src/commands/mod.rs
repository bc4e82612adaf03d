//! CLI command definitions and dispatch.

pub mod listing;
pub mod migrate;
pub mod repair;
pub mod serve;

use clap::{Parser, Subcommand};

use agentmart_core::config::AppConfig;
use agentmart_core::error::AppError;
use agentmart_database::DatabasePool;

use crate::output::OutputFormat;

/// AgentMart: agent marketplace listing and review service
#[derive(Debug, Parser)]
#[command(name = "agentmart", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay (`config/{env}.toml`)
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the AgentMart server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Inspect listings and their review history
    Listing(listing::ListingArgs),
    /// Scan for and repair listing flag drift
    Repair(repair::RepairArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load(&self.config, &self.env)?;

        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Migrate(args) => migrate::execute(args, &config, self.format).await,
            Commands::Listing(args) => listing::execute(args, &config, self.format).await,
            Commands::Repair(args) => repair::execute(args, &config, self.format).await,
        }
    }
}

/// Helper: create database pool from config
pub async fn create_db_pool(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}
