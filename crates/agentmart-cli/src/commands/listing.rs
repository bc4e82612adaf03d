//! Listing inspection commands (read-only, staff view).

use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use agentmart_core::config::AppConfig;
use agentmart_core::error::AppError;
use agentmart_core::types::PageRequest;
use agentmart_database::store::ListingStore;
use agentmart_entity::listing::{Listing, ListingStatus};
use agentmart_service::Lineage;
use agentmart_service::notify::audit::LISTING_TARGET;

use crate::output::{self, OutputFormat};

/// Arguments for listing commands
#[derive(Debug, Args)]
pub struct ListingArgs {
    /// Listing subcommand
    #[command(subcommand)]
    pub command: ListingCommand,
}

/// Listing subcommands
#[derive(Debug, Subcommand)]
pub enum ListingCommand {
    /// Show one listing by ID or slug
    Show {
        /// Listing ID or slug
        target: String,
    },
    /// Show every version in a listing's lineage
    Lineage {
        /// Listing ID or slug
        target: String,
    },
    /// Show the review queue, oldest submission first
    Queue {
        /// Page number
        #[arg(short, long, default_value = "1")]
        page: u64,
        /// Items per page
        #[arg(long, default_value = "25")]
        per_page: u64,
    },
    /// Show the audit trail of a listing
    History {
        /// Listing ID
        id: Uuid,
        /// Number of entries
        #[arg(short, long, default_value = "50")]
        limit: u64,
    },
}

/// Listing display row
#[derive(Debug, Serialize, Tabled)]
struct ListingRow {
    /// ID
    id: String,
    /// Slug
    slug: String,
    /// Version
    version: i32,
    /// Status
    status: String,
    /// Live
    latest: bool,
    /// Pending update
    active_update: bool,
    /// Submitted
    submitted: String,
}

impl From<&Listing> for ListingRow {
    fn from(l: &Listing) -> Self {
        Self {
            id: l.id.to_string(),
            slug: l.slug.clone(),
            version: l.version,
            status: l.status.to_string(),
            latest: l.is_latest_version,
            active_update: l.has_active_update,
            submitted: l
                .submitted_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Audit display row
#[derive(Debug, Serialize, Tabled)]
struct HistoryRow {
    /// Time
    time: String,
    /// Actor
    actor: String,
    /// Action
    action: String,
    /// Details
    details: String,
}

/// Execute listing commands
pub async fn execute(
    args: &ListingArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;
    let store: Arc<dyn ListingStore> = Arc::new(pool.listing_store());

    match &args.command {
        ListingCommand::Show { target } => {
            let listing = find(store.as_ref(), target).await?;
            match format {
                OutputFormat::Json => output::print_json(&listing),
                OutputFormat::Table => print_listing(&listing),
            }
        }
        ListingCommand::Lineage { target } => {
            let listing = find(store.as_ref(), target).await?;
            let lineage = Lineage::load(store.as_ref(), listing).await?;
            match format {
                OutputFormat::Json => output::print_json(&lineage),
                OutputFormat::Table => {
                    let rows: Vec<ListingRow> =
                        lineage.versions.iter().map(ListingRow::from).collect();
                    output::print_list(&rows, format);
                    if lineage.live_id.is_none() {
                        output::print_warning("No version of this lineage is live.");
                    }
                }
            }
        }
        ListingCommand::Queue { page, per_page } => {
            let page = store
                .find_by_status(ListingStatus::UnderReview, &PageRequest::new(*page, *per_page))
                .await?;
            let rows: Vec<ListingRow> = page.items.iter().map(ListingRow::from).collect();
            output::print_list(&rows, format);
            if format == OutputFormat::Table {
                println!(
                    "Page {} of {} ({} waiting)",
                    page.page, page.total_pages, page.total_items
                );
            }
        }
        ListingCommand::History { id, limit } => {
            let history = pool
                .audit_repository()
                .find_by_target(LISTING_TARGET, *id, &PageRequest::new(1, *limit))
                .await?;
            let rows: Vec<HistoryRow> = history
                .items
                .iter()
                .map(|e| HistoryRow {
                    time: e.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    actor: e
                        .actor_id
                        .map(|a| a.to_string())
                        .unwrap_or_else(|| "system".to_string()),
                    action: e.action.clone(),
                    details: e
                        .details
                        .as_ref()
                        .map(|d| d.to_string())
                        .unwrap_or_default(),
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    pool.close().await;
    Ok(())
}

/// Resolve a listing by ID, falling back to slug.
async fn find(store: &dyn ListingStore, target: &str) -> Result<Listing, AppError> {
    let found = match Uuid::parse_str(target) {
        Ok(id) => store.find_by_id(id).await?,
        Err(_) => store.find_by_slug(target).await?,
    };
    found.ok_or_else(|| AppError::not_found(format!("Listing '{target}' not found")))
}

fn print_listing(l: &Listing) {
    output::print_kv("ID", &l.id.to_string());
    output::print_kv("Slug", &l.slug);
    output::print_kv("Title", &l.content.title);
    output::print_kv("Owner", &l.owner_id.to_string());
    output::print_kv("Version", &l.version.to_string());
    output::print_kv("Status", l.status.as_str());
    output::print_kv(
        "Parent",
        &l.parent_id
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string()),
    );
    output::print_kv("Live", &l.is_latest_version.to_string());
    output::print_kv("Pending update", &l.has_active_update.to_string());
    if let Some(reason) = &l.rejection_reason {
        output::print_kv("Rejection reason", reason);
    }
    output::print_kv("Updated", &l.updated_at.to_rfc3339());
}
