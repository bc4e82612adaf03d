//! Consistency scan and repair commands.
//!
//! Repairs rewrite listing flags outside the review workflow; run them while
//! the marketplace is quiet.

use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use agentmart_auth::RbacEnforcer;
use agentmart_core::config::AppConfig;
use agentmart_core::error::AppError;
use agentmart_entity::user::UserRole;
use agentmart_service::{
    AuditNotifier, ConsistencyIssue, ConsistencyService, NotifierSet, RequestContext,
    TracingNotifier,
};

use crate::output::{self, OutputFormat};

/// Arguments for repair commands
#[derive(Debug, Args)]
pub struct RepairArgs {
    /// Repair subcommand
    #[command(subcommand)]
    pub command: RepairCommand,
}

/// Repair subcommands
#[derive(Debug, Subcommand)]
pub enum RepairCommand {
    /// Report inconsistencies without changing anything
    Scan,
    /// Correct every repairable inconsistency
    Fix {
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Issue display row
#[derive(Debug, Serialize, Tabled)]
struct IssueRow {
    /// Issue
    issue: String,
    /// Listing
    listing_id: String,
    /// Repairable
    repairable: bool,
    /// Detail
    detail: String,
}

impl From<&ConsistencyIssue> for IssueRow {
    fn from(i: &ConsistencyIssue) -> Self {
        Self {
            issue: i.kind.code().to_string(),
            listing_id: i.listing_id.to_string(),
            repairable: i.kind.corrected_flag().is_some(),
            detail: i.detail.clone(),
        }
    }
}

/// Execute repair commands
pub async fn execute(
    args: &RepairArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;
    let notifier = NotifierSet::new()
        .with(Arc::new(TracingNotifier))
        .with(Arc::new(AuditNotifier::new(pool.audit_repository())));
    let service = ConsistencyService::new(
        Arc::new(pool.listing_store()),
        Arc::new(notifier),
        Arc::new(RbacEnforcer::new()),
    );
    let ctx = RequestContext::system(UserRole::Admin);

    let report = service.scan(&ctx).await?;
    if let RepairCommand::Scan = args.command {
        print_issues(&report.issues, format);
        if format == OutputFormat::Table {
            println!("{} listings scanned, {} issues", report.scanned, report.issues.len());
        }
        pool.close().await;
        return Ok(());
    }

    if report.is_clean() {
        output::print_success("No inconsistencies found.");
        pool.close().await;
        return Ok(());
    }

    let repairable = report.repairable().count();
    print_issues(&report.issues, format);

    if let RepairCommand::Fix { yes: false } = args.command {
        let confirm = dialoguer::Confirm::new()
            .with_prompt(format!("Repair {repairable} listing flag(s)?"))
            .default(false)
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

        if !confirm {
            println!("Cancelled.");
            pool.close().await;
            return Ok(());
        }
    }

    let summary = service.repair(&ctx).await?;
    match format {
        OutputFormat::Json => output::print_json(&summary),
        OutputFormat::Table => {
            output::print_success(&format!("{} flag(s) repaired.", summary.repaired.len()));
            if !summary.skipped.is_empty() {
                output::print_warning(&format!(
                    "{} finding(s) no longer applied and were skipped.",
                    summary.skipped.len()
                ));
            }
            let manual = summary
                .report
                .issues
                .iter()
                .filter(|i| i.kind.corrected_flag().is_none())
                .count();
            if manual > 0 {
                output::print_warning(&format!("{manual} finding(s) need manual attention."));
            }
        }
    }

    pool.close().await;
    Ok(())
}

fn print_issues(issues: &[ConsistencyIssue], format: OutputFormat) {
    let rows: Vec<IssueRow> = issues.iter().map(IssueRow::from).collect();
    output::print_list(&rows, format);
}
