//! Payment record and its lifecycle.
//!
//! A payment is created PENDING when a gateway order exists and moves to
//! SUCCESS after signature verification, or to FAILED when the client
//! reports an abandoned checkout. Both terminal states are final.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::content::ContentKind;
use crate::domain::foundation::{
    ContentId, PaymentId, PlanId, SubscriptionId, Timestamp, UserId, ValidationError,
};

use super::CommerceError;

/// Minor units per major currency unit.
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// Gateway receipts are limited to this many characters.
pub const MAX_RECEIPT_LEN: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Success => "SUCCESS",
            PaymentStatus::Failed => "FAILED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Some(PaymentStatus::Pending),
            "SUCCESS" => Some(PaymentStatus::Success),
            "FAILED" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a payment pays for. Stored as the payment's metadata JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentPurpose {
    Blog {
        #[serde(rename = "itemId")]
        item_id: ContentId,
    },
    Resource {
        #[serde(rename = "itemId")]
        item_id: ContentId,
    },
    Subscription {
        #[serde(rename = "planId")]
        plan_id: PlanId,
        #[serde(rename = "subscriptionId")]
        subscription_id: SubscriptionId,
    },
}

impl PaymentPurpose {
    pub fn content(kind: ContentKind, item_id: ContentId) -> Self {
        match kind {
            ContentKind::Blog => PaymentPurpose::Blog { item_id },
            ContentKind::Resource => PaymentPurpose::Resource { item_id },
        }
    }

    /// The content item bought, if this is a one-time purchase.
    pub fn content_item(&self) -> Option<(ContentKind, ContentId)> {
        match *self {
            PaymentPurpose::Blog { item_id } => Some((ContentKind::Blog, item_id)),
            PaymentPurpose::Resource { item_id } => Some((ContentKind::Resource, item_id)),
            PaymentPurpose::Subscription { .. } => None,
        }
    }

    pub fn type_str(&self) -> &'static str {
        match self {
            PaymentPurpose::Blog { .. } => "BLOG",
            PaymentPurpose::Resource { .. } => "RESOURCE",
            PaymentPurpose::Subscription { .. } => "SUBSCRIPTION",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub user_id: UserId,
    /// Amount in minor units.
    pub amount: i64,
    pub currency: String,
    pub status: PaymentStatus,
    pub gateway_order_id: String,
    pub gateway_payment_id: Option<String>,
    pub signature: Option<String>,
    pub purpose: PaymentPurpose,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Payment {
    /// Creates a PENDING payment for an existing gateway order.
    pub fn pending(
        id: PaymentId,
        user_id: UserId,
        amount: i64,
        currency: impl Into<String>,
        gateway_order_id: impl Into<String>,
        purpose: PaymentPurpose,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            user_id,
            amount,
            currency: currency.into(),
            status: PaymentStatus::Pending,
            gateway_order_id: gateway_order_id.into(),
            gateway_payment_id: None,
            signature: None,
            purpose,
            created_at: now,
            updated_at: now,
        }
    }

    /// Records a verified gateway payment.
    pub fn mark_success(
        &mut self,
        gateway_payment_id: impl Into<String>,
        signature: impl Into<String>,
    ) -> Result<(), CommerceError> {
        if self.status != PaymentStatus::Pending {
            return Err(CommerceError::invalid_state(self.status.as_str(), "verify payment"));
        }
        self.status = PaymentStatus::Success;
        self.gateway_payment_id = Some(gateway_payment_id.into());
        self.signature = Some(signature.into());
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Records an abandoned or declined checkout.
    pub fn mark_failed(&mut self) -> Result<(), CommerceError> {
        if self.status != PaymentStatus::Pending {
            return Err(CommerceError::invalid_state(self.status.as_str(), "fail payment"));
        }
        self.status = PaymentStatus::Failed;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.user_id == *user_id
    }
}

/// Converts a whole major-unit price into gateway minor units.
pub fn to_minor_units(price: i64) -> Result<i64, ValidationError> {
    if price <= 0 {
        return Err(ValidationError::out_of_range("price", 1, i64::MAX / MINOR_UNITS_PER_MAJOR, price));
    }
    price
        .checked_mul(MINOR_UNITS_PER_MAJOR)
        .ok_or_else(|| ValidationError::invalid_format("price", "amount overflows"))
}

/// Gateway receipt for a payment, at most [`MAX_RECEIPT_LEN`] characters.
pub fn receipt_for(payment_id: &PaymentId) -> String {
    let mut receipt = format!("rcpt_{}", payment_id.as_uuid().simple());
    receipt.truncate(MAX_RECEIPT_LEN);
    receipt
}
