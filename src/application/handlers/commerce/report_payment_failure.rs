//! ReportPaymentFailureHandler - marks an abandoned checkout as FAILED.

use std::sync::Arc;

use crate::domain::commerce::{CommerceError, Payment, PaymentStatus};
use crate::domain::foundation::{AuthenticatedUser, PaymentId};
use crate::ports::PaymentRepository;

#[derive(Debug, Clone)]
pub struct ReportPaymentFailureCommand {
    pub user: AuthenticatedUser,
    pub payment_id: PaymentId,
    /// Gateway-supplied reason, logged only.
    pub reason: Option<String>,
}

pub struct ReportPaymentFailureHandler {
    payments: Arc<dyn PaymentRepository>,
}

impl ReportPaymentFailureHandler {
    pub fn new(payments: Arc<dyn PaymentRepository>) -> Self {
        Self { payments }
    }

    pub async fn handle(&self, cmd: ReportPaymentFailureCommand) -> Result<Payment, CommerceError> {
        let payment = self.find_owned(&cmd).await?;

        match payment.status {
            PaymentStatus::Failed => return Ok(payment),
            PaymentStatus::Success => {
                return Err(CommerceError::invalid_state(payment.status.as_str(), "fail payment"));
            }
            PaymentStatus::Pending => {}
        }

        if !self.payments.mark_failed(&payment.id).await? {
            // Lost a race with verification or another report
            let current = self.find_owned(&cmd).await?;
            return match current.status {
                PaymentStatus::Failed => Ok(current),
                status => Err(CommerceError::invalid_state(status.as_str(), "fail payment")),
            };
        }

        tracing::info!(
            payment_id = %payment.id,
            user_id = %cmd.user.id,
            reason = cmd.reason.as_deref().unwrap_or("unspecified"),
            "Payment marked failed"
        );
        self.find_owned(&cmd).await
    }

    async fn find_owned(&self, cmd: &ReportPaymentFailureCommand) -> Result<Payment, CommerceError> {
        self.payments
            .find_by_id(&cmd.payment_id)
            .await?
            .filter(|p| p.is_owned_by(&cmd.user.id))
            .ok_or_else(|| CommerceError::payment_not_found(cmd.payment_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::commerce::test_support::*;
    use crate::domain::commerce::PaymentPurpose;
    use crate::domain::content::ContentKind;
    use crate::domain::foundation::{ContentId, ErrorCode, Role, UserId};
    use crate::ports::{GatewayConfirmation, Grant};

    async fn pending(fx: &Fixture) -> Payment {
        let payment = Payment::pending(
            PaymentId::new(),
            fx.buyer.id,
            10_000,
            "INR",
            "order_1",
            PaymentPurpose::content(ContentKind::Resource, ContentId::new()),
        );
        PaymentRepository::insert(&fx.store, &payment).await.unwrap();
        payment
    }

    fn cmd(user: AuthenticatedUser, payment_id: PaymentId) -> ReportPaymentFailureCommand {
        ReportPaymentFailureCommand {
            user,
            payment_id,
            reason: Some("user closed checkout".to_string()),
        }
    }

    #[tokio::test]
    async fn pending_payment_becomes_failed() {
        let fx = Fixture::new().await;
        let payment = pending(&fx).await;
        let handler = ReportPaymentFailureHandler::new(Arc::new(fx.store.clone()));

        let result = handler.handle(cmd(fx.buyer.clone(), payment.id)).await.unwrap();
        assert_eq!(result.status, PaymentStatus::Failed);

        // Repeat reports are harmless
        let again = handler.handle(cmd(fx.buyer.clone(), payment.id)).await.unwrap();
        assert_eq!(again.status, PaymentStatus::Failed);
    }

    #[tokio::test]
    async fn successful_payment_cannot_be_failed() {
        let fx = Fixture::new().await;
        let payment = pending(&fx).await;
        fx.store
            .complete(
                &payment.id,
                GatewayConfirmation {
                    gateway_payment_id: "pay_1".to_string(),
                    signature: "sig".to_string(),
                },
                Grant::Purchase(crate::domain::commerce::Purchase::new(
                    fx.buyer.id,
                    ContentKind::Resource,
                    ContentId::new(),
                    payment.id,
                )),
            )
            .await
            .unwrap();

        let err = ReportPaymentFailureHandler::new(Arc::new(fx.store.clone()))
            .handle(cmd(fx.buyer.clone(), payment.id))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidStateTransition);
    }

    #[tokio::test]
    async fn other_users_cannot_fail_a_payment() {
        let fx = Fixture::new().await;
        let payment = pending(&fx).await;
        let stranger = AuthenticatedUser::new(UserId::new(), "x@example.com", None, Role::User);

        let err = ReportPaymentFailureHandler::new(Arc::new(fx.store.clone()))
            .handle(cmd(stranger, payment.id))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::PaymentNotFound);
        assert_eq!(fx.payment(&payment.id).await.status, PaymentStatus::Pending);
    }
}
