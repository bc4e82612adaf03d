//! Listing pricing model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How buyers pay for access to an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "pricing_model", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PricingModel {
    /// No charge.
    #[default]
    Free,
    /// Single purchase.
    OneTime,
    /// Recurring subscription.
    Subscription,
}

impl PricingModel {
    /// Return the pricing model as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::OneTime => "one_time",
            Self::Subscription => "subscription",
        }
    }
}

impl fmt::Display for PricingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
