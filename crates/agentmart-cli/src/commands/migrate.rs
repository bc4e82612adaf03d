//! Database migration management commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use agentmart_core::config::AppConfig;
use agentmart_core::error::AppError;
use agentmart_database::migration;

use crate::output::{self, OutputFormat};

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
    /// Show migration status
    Status,
    /// Reset database (drop all tables and re-run)
    Reset {
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

/// Migration display row
#[derive(Debug, Serialize, Tabled)]
struct MigrationRow {
    /// Version
    version: i64,
    /// Description
    description: String,
    /// Applied
    applied: String,
}

/// Execute migration commands
pub async fn execute(
    args: &MigrateArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;

    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            migration::run_migrations(pool.pool()).await?;
            output::print_success("All migrations applied successfully.");
        }
        MigrateCommand::Status => {
            let rows: Vec<MigrationRow> = migration::migration_status(pool.pool())
                .await?
                .into_iter()
                .map(|m| MigrationRow {
                    version: m.version,
                    description: m.description,
                    applied: if m.applied { "yes" } else { "pending" }.to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }
        MigrateCommand::Reset { force } => {
            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt("This will DROP all tables and re-run migrations. Continue?")
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            println!("Resetting database...");
            migration::reset_database(pool.pool()).await?;
            output::print_success("Database reset complete.");
        }
    }

    pool.close().await;
    Ok(())
}
