//! CreateOrderHandler - Command handler for starting a one-time purchase.
//!
//! Ownership is checked before the gateway is contacted, so a repeat buyer
//! never creates a stray gateway order.

use std::sync::Arc;

use crate::domain::commerce::{receipt_for, to_minor_units, CommerceError, Payment, PaymentPurpose};
use crate::domain::content::ContentKind;
use crate::domain::foundation::{AuthenticatedUser, ContentId, PaymentId};
use crate::ports::{ContentRepository, CreateOrderRequest, EntitlementReader, PaymentGateway, PaymentRepository};

#[derive(Debug, Clone)]
pub struct CreateOrderCommand {
    pub user: AuthenticatedUser,
    pub kind: ContentKind,
    pub item_id: ContentId,
}

/// What the client needs to open the gateway checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOrder {
    pub payment_id: PaymentId,
    pub gateway_order_id: String,
    /// Minor units.
    pub amount: i64,
    pub currency: String,
    pub key_id: Option<String>,
}

pub struct CreateOrderHandler {
    content: Arc<dyn ContentRepository>,
    entitlements: Arc<dyn EntitlementReader>,
    payments: Arc<dyn PaymentRepository>,
    gateway: Arc<dyn PaymentGateway>,
    currency: String,
}

impl CreateOrderHandler {
    pub fn new(
        content: Arc<dyn ContentRepository>,
        entitlements: Arc<dyn EntitlementReader>,
        payments: Arc<dyn PaymentRepository>,
        gateway: Arc<dyn PaymentGateway>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            content,
            entitlements,
            payments,
            gateway,
            currency: currency.into(),
        }
    }

    pub async fn handle(&self, cmd: CreateOrderCommand) -> Result<CheckoutOrder, CommerceError> {
        // 1. Item must exist, be published and be purchasable
        let item = self
            .content
            .find_by_id(cmd.kind, &cmd.item_id)
            .await?
            .filter(|item| item.published)
            .ok_or_else(|| CommerceError::content_not_found(cmd.item_id))?;

        let price = match item.price {
            Some(price) if item.is_purchasable() => price,
            _ => return Err(CommerceError::not_purchasable(item.id)),
        };

        // 2. Reject repeat purchases before any gateway call
        if self
            .entitlements
            .has_purchase(&cmd.user.id, item.kind, &item.id)
            .await?
        {
            return Err(CommerceError::already_purchased(item.id));
        }

        // 3. Create gateway order
        let amount = to_minor_units(price)?;
        let payment_id = PaymentId::new();
        let purpose = PaymentPurpose::content(item.kind, item.id);
        let order = self
            .gateway
            .create_order(CreateOrderRequest {
                amount,
                currency: self.currency.clone(),
                receipt: receipt_for(&payment_id),
                notes: vec![
                    ("type".to_string(), purpose.type_str().to_string()),
                    ("itemId".to_string(), item.id.to_string()),
                    ("userId".to_string(), cmd.user.id.to_string()),
                ],
            })
            .await?;

        // 4. Persist pending payment
        let payment = Payment::pending(
            payment_id,
            cmd.user.id,
            amount,
            self.currency.clone(),
            order.id.clone(),
            purpose,
        );
        self.payments.insert(&payment).await?;

        tracing::info!(
            payment_id = %payment.id,
            user_id = %cmd.user.id,
            item_id = %item.id,
            amount,
            "Checkout order created"
        );

        Ok(CheckoutOrder {
            payment_id: payment.id,
            gateway_order_id: order.id,
            amount,
            currency: self.currency.clone(),
            key_id: self.gateway.public_key_id(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::commerce::test_support::*;
    use crate::domain::commerce::PaymentStatus;
    use crate::domain::content::AccessType;
    use crate::domain::foundation::ErrorCode;
    use crate::ports::PaymentGatewayError;

    fn handler(fx: &Fixture) -> CreateOrderHandler {
        CreateOrderHandler::new(
            Arc::new(fx.store.clone()),
            Arc::new(fx.store.clone()),
            Arc::new(fx.store.clone()),
            Arc::new(fx.gateway.clone()),
            "INR",
        )
    }

    fn cmd(fx: &Fixture, item_id: ContentId) -> CreateOrderCommand {
        CreateOrderCommand {
            user: fx.buyer.clone(),
            kind: ContentKind::Blog,
            item_id,
        }
    }

    #[tokio::test]
    async fn creates_pending_payment_for_paid_item() {
        let fx = Fixture::new().await;
        let item = fx.add_item(AccessType::Paid, Some(499)).await;

        let order = handler(&fx).handle(cmd(&fx, item.id)).await.unwrap();

        assert_eq!(order.amount, 49_900);
        assert_eq!(order.currency, "INR");
        assert_eq!(order.gateway_order_id, "order_mock_1");
        let stored = fx.payment(&order.payment_id).await;
        assert_eq!(stored.status, PaymentStatus::Pending);
        assert_eq!(stored.purpose, PaymentPurpose::content(ContentKind::Blog, item.id));

        let request = &fx.gateway.requests()[0];
        assert!(request.receipt.len() <= 40);
        assert_eq!(request.amount, 49_900);
    }

    #[tokio::test]
    async fn repeat_purchase_is_rejected_before_gateway() {
        let fx = Fixture::new().await;
        let item = fx.add_item(AccessType::Paid, Some(100)).await;
        fx.grant_purchase(&fx.buyer, &item).await;

        let err = handler(&fx).handle(cmd(&fx, item.id)).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::AlreadyPurchased);
        assert_eq!(fx.gateway.order_count(), 0);
    }

    #[tokio::test]
    async fn free_and_subscription_items_are_not_purchasable() {
        let fx = Fixture::new().await;
        for access in [AccessType::Free, AccessType::Subscription] {
            let item = fx.add_item(access, None).await;
            let err = handler(&fx).handle(cmd(&fx, item.id)).await.unwrap_err();
            assert_eq!(err.code(), ErrorCode::NotPurchasable);
        }
        assert_eq!(fx.gateway.order_count(), 0);
    }

    #[tokio::test]
    async fn unknown_item_is_not_found() {
        let fx = Fixture::new().await;
        let err = handler(&fx).handle(cmd(&fx, ContentId::new())).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ContentNotFound);
    }

    #[tokio::test]
    async fn gateway_rejection_leaves_no_payment() {
        let fx = Fixture::new().await;
        let item = fx.add_item(AccessType::Paid, Some(100)).await;
        fx.gateway
            .fail_next(PaymentGatewayError::Rejected("Authentication failed".to_string()));

        let err = handler(&fx).handle(cmd(&fx, item.id)).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::GatewayError);
        assert!(err.message().contains("Authentication failed"));
        assert!(fx.all_payments().await.is_empty());
    }

    #[tokio::test]
    async fn unconfigured_gateway_is_a_config_error() {
        let fx = Fixture::new().await;
        let item = fx.add_item(AccessType::Paid, Some(100)).await;
        fx.gateway.fail_next(PaymentGatewayError::NotConfigured);

        let err = handler(&fx).handle(cmd(&fx, item.id)).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::GatewayNotConfigured);
    }
}
