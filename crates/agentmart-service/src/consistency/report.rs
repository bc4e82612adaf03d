//! Consistency findings.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use agentmart_entity::listing::{Listing, ListingStatus};

/// Category of a consistency finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    /// Active-update flag set with no pending child.
    StaleActiveUpdate,
    /// Live listing has a pending child but the flag is clear.
    MissingActiveUpdate,
    /// More than one DRAFT or UNDER_REVIEW child hangs off the same listing.
    MultiplePendingUpdates,
    /// Active-update flag set on a listing that is not APPROVED.
    FlagOnUnapproved,
    /// `parent_id` points at a listing that does not exist.
    OrphanedVersion,
    /// More than one version of a lineage is marked latest.
    MultipleLatest,
}

impl IssueKind {
    /// Upper-case issue code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::StaleActiveUpdate => "STALE_ACTIVE_UPDATE",
            Self::MissingActiveUpdate => "MISSING_ACTIVE_UPDATE",
            Self::MultiplePendingUpdates => "MULTIPLE_PENDING_UPDATES",
            Self::FlagOnUnapproved => "FLAG_ON_UNAPPROVED",
            Self::OrphanedVersion => "ORPHANED_VERSION",
            Self::MultipleLatest => "MULTIPLE_LATEST",
        }
    }

    /// Value the repair writes to `has_active_update`, or `None` for
    /// report-only findings.
    pub fn corrected_flag(&self) -> Option<bool> {
        match self {
            Self::StaleActiveUpdate | Self::FlagOnUnapproved => Some(false),
            Self::MissingActiveUpdate => Some(true),
            Self::MultiplePendingUpdates | Self::OrphanedVersion | Self::MultipleLatest => None,
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One finding.
#[derive(Debug, Clone, Serialize)]
pub struct ConsistencyIssue {
    /// Finding category.
    pub kind: IssueKind,
    /// The affected listing (the lineage root for `MultipleLatest`).
    pub listing_id: Uuid,
    /// Human-readable description.
    pub detail: String,
}

/// Result of a scan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConsistencyReport {
    /// Number of listings examined.
    pub scanned: usize,
    /// Findings, in listing creation order.
    pub issues: Vec<ConsistencyIssue>,
}

impl ConsistencyReport {
    /// Whether no finding was reported.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Findings the repair can correct.
    pub fn repairable(&self) -> impl Iterator<Item = &ConsistencyIssue> {
        self.issues
            .iter()
            .filter(|i| i.kind.corrected_flag().is_some())
    }

    /// Build a report from a full snapshot of the listings table.
    pub fn from_snapshot(listings: &[Listing]) -> Self {
        let by_id: HashMap<Uuid, &Listing> = listings.iter().map(|l| (l.id, l)).collect();
        let mut pending: HashMap<Uuid, usize> = HashMap::new();
        for l in listings {
            if let Some(parent_id) = l.parent_id {
                if l.status.is_pending() {
                    *pending.entry(parent_id).or_default() += 1;
                }
            }
        }

        let mut issues = Vec::new();
        for l in listings {
            if let Some(parent_id) = l.parent_id {
                if !by_id.contains_key(&parent_id) {
                    issues.push(ConsistencyIssue {
                        kind: IssueKind::OrphanedVersion,
                        listing_id: l.id,
                        detail: format!("parent {parent_id} does not exist"),
                    });
                }
            }
            let pending_children = pending.get(&l.id).copied().unwrap_or(0);
            if let Some(kind) = classify_flag(l, pending_children) {
                issues.push(ConsistencyIssue {
                    kind,
                    listing_id: l.id,
                    detail: flag_detail(kind, l, pending_children),
                });
            }
            if pending_children > 1 {
                issues.push(ConsistencyIssue {
                    kind: IssueKind::MultiplePendingUpdates,
                    listing_id: l.id,
                    detail: format!("{pending_children} pending updates"),
                });
            }
        }

        let mut latest_per_root: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for l in listings.iter().filter(|l| l.is_latest_version) {
            latest_per_root
                .entry(lineage_root(l, &by_id))
                .or_default()
                .push(l.id);
        }
        let mut roots: Vec<_> = latest_per_root
            .into_iter()
            .filter(|(_, ids)| ids.len() > 1)
            .collect();
        roots.sort_by_key(|(root, _)| by_id.get(root).map(|l| l.created_at));
        for (root, ids) in roots {
            issues.push(ConsistencyIssue {
                kind: IssueKind::MultipleLatest,
                listing_id: root,
                detail: format!("{} versions marked latest", ids.len()),
            });
        }

        Self {
            scanned: listings.len(),
            issues,
        }
    }
}

/// Result of a repair run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RepairSummary {
    /// The scan the repair started from.
    pub report: ConsistencyReport,
    /// Findings corrected.
    pub repaired: Vec<ConsistencyIssue>,
    /// Repairable findings that no longer applied under lock.
    pub skipped: Vec<ConsistencyIssue>,
}

/// Classify the active-update flag of one listing given its pending child count.
pub(crate) fn classify_flag(listing: &Listing, pending_children: usize) -> Option<IssueKind> {
    if listing.has_active_update {
        if listing.status != ListingStatus::Approved {
            Some(IssueKind::FlagOnUnapproved)
        } else if pending_children == 0 {
            Some(IssueKind::StaleActiveUpdate)
        } else {
            None
        }
    } else if listing.is_public() && pending_children > 0 {
        Some(IssueKind::MissingActiveUpdate)
    } else {
        None
    }
}

fn flag_detail(kind: IssueKind, listing: &Listing, pending_children: usize) -> String {
    match kind {
        IssueKind::FlagOnUnapproved => format!(
            "has_active_update set while status is {}",
            listing.status
        ),
        IssueKind::StaleActiveUpdate => "has_active_update set with no pending child".to_string(),
        IssueKind::MissingActiveUpdate => format!(
            "{pending_children} pending child(ren) but has_active_update is clear"
        ),
        _ => String::new(),
    }
}

fn lineage_root(listing: &Listing, by_id: &HashMap<Uuid, &Listing>) -> Uuid {
    let mut current = listing;
    let mut seen = HashSet::from([current.id]);
    while let Some(parent) = current.parent_id.and_then(|p| by_id.get(&p).copied()) {
        if !seen.insert(parent.id) {
            break;
        }
        current = parent;
    }
    current.id
}
