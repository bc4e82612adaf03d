//! Review workflow configuration.

use serde::{Deserialize, Serialize};

/// Settings applied by the review endpoints around the state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Minimum length of a rejection reason after trimming.
    #[serde(default = "default_min_reason_len")]
    pub min_rejection_reason_len: usize,
    /// Whether staff may approve or reject listings they own.
    #[serde(default)]
    pub allow_self_review: bool,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            min_rejection_reason_len: default_min_reason_len(),
            allow_self_review: false,
        }
    }
}

fn default_min_reason_len() -> usize {
    10
}
