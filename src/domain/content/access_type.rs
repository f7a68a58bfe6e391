//! Access classification of a content item.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a content item is gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessType {
    /// Anyone may read the full content.
    Free,
    /// Requires a one-time purchase of this item.
    Paid,
    /// Requires an active subscription.
    Subscription,
}

impl AccessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessType::Free => "FREE",
            AccessType::Paid => "PAID",
            AccessType::Subscription => "SUBSCRIPTION",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "FREE" => Some(AccessType::Free),
            "PAID" => Some(AccessType::Paid),
            "SUBSCRIPTION" => Some(AccessType::Subscription),
            _ => None,
        }
    }

    /// True when the item carries a price.
    pub fn requires_price(&self) -> bool {
        matches!(self, AccessType::Paid)
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
