//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use agentmart_entity::listing::{ListingContent, PricingModel};

/// Body of create and edit requests.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ListingContentRequest {
    /// Display title; the routing slug is derived from it on creation.
    #[validate(length(min = 1, max = 120, message = "Title must be 1-120 characters"))]
    pub title: String,
    /// Long-form description.
    #[serde(default)]
    #[validate(length(max = 20000))]
    pub description: String,
    /// Marketplace category.
    #[validate(length(min = 1, max = 64))]
    pub category: Option<String>,
    /// Search tags.
    #[serde(default)]
    #[validate(length(max = 20, message = "At most 20 tags"))]
    pub tags: Vec<String>,
    /// Price in the smallest currency unit.
    #[serde(default)]
    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub price_cents: i64,
    /// ISO 4217 currency code.
    #[serde(default = "default_currency")]
    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: String,
    /// How buyers pay.
    #[serde(default)]
    pub pricing_model: PricingModel,
    /// Agent workflow definition.
    #[serde(default = "default_workflow")]
    pub workflow: serde_json::Value,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_workflow() -> serde_json::Value {
    serde_json::json!({})
}

impl ListingContentRequest {
    /// Converts into the entity content, normalizing whitespace and case.
    pub fn into_content(self) -> ListingContent {
        ListingContent {
            title: self.title.trim().to_string(),
            description: self.description,
            category: self.category.map(|c| c.trim().to_string()),
            tags: self
                .tags
                .into_iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
            price_cents: self.price_cents,
            currency: self.currency.to_uppercase(),
            pricing_model: self.pricing_model,
            workflow: self.workflow,
        }
    }
}

/// Body of a rejection.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RejectRequest {
    /// Feedback shown to the seller.
    #[validate(length(min = 1, max = 2000, message = "A rejection reason is required"))]
    pub reason: String,
}
