//! Version history of one listing lineage.

use std::collections::{HashSet, VecDeque};

use serde::Serialize;
use uuid::Uuid;

use agentmart_core::result::AppResult;
use agentmart_database::store::ListingStore;
use agentmart_entity::listing::Listing;

/// Upper bound on parent hops, guarding against corrupted parent chains.
const MAX_DEPTH: usize = 1024;

/// Every version of a lineage, oldest first.
#[derive(Debug, Clone, Serialize)]
pub struct Lineage {
    /// The original listing of the lineage.
    pub root_id: Uuid,
    /// The version currently serving live traffic, if any.
    pub live_id: Option<Uuid>,
    /// All versions ordered by version number.
    pub versions: Vec<Listing>,
}

impl Lineage {
    /// Collect the lineage containing `start`.
    ///
    /// Walks parent links up to the root, then gathers every descendant.
    /// A dangling parent link ends the upward walk at the orphan.
    pub async fn load(store: &dyn ListingStore, start: Listing) -> AppResult<Self> {
        let mut root = start;
        let mut seen = HashSet::from([root.id]);
        while let Some(parent_id) = root.parent_id {
            if seen.len() >= MAX_DEPTH || !seen.insert(parent_id) {
                break;
            }
            match store.find_by_id(parent_id).await? {
                Some(parent) => root = parent,
                None => break,
            }
        }

        let root_id = root.id;
        let mut versions = Vec::new();
        let mut visited = HashSet::from([root_id]);
        let mut queue = VecDeque::from([root]);
        while let Some(listing) = queue.pop_front() {
            for child in store.find_children(listing.id).await? {
                if visited.insert(child.id) {
                    queue.push_back(child);
                }
            }
            versions.push(listing);
        }
        versions.sort_by_key(|l| (l.version, l.created_at));

        let live_id = versions
            .iter()
            .find(|l| l.is_public())
            .map(|l| l.id);

        Ok(Self {
            root_id,
            live_id,
            versions,
        })
    }

    /// Number of versions in the lineage.
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Whether the lineage is empty (never true for a loaded lineage).
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}
