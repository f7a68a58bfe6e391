//! VerifyPaymentHandler - Command handler for the checkout callback.
//!
//! Verifies the gateway signature, then completes the payment and grants the
//! entitlement in one repository call. Verifying an already successful payment
//! succeeds without granting twice.

use std::sync::Arc;

use crate::domain::commerce::{
    CommerceError, Payment, PaymentPurpose, PaymentSignatureVerifier, PaymentStatus, Purchase,
};
use crate::domain::foundation::{AuthenticatedUser, PaymentId, Timestamp};
use crate::ports::{
    Completion, EmailMessage, EmailSender, GatewayConfirmation, Grant, PaymentRepository, PlanRepository,
};

#[derive(Debug, Clone)]
pub struct VerifyPaymentCommand {
    pub user: AuthenticatedUser,
    pub payment_id: PaymentId,
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyPaymentResult {
    pub payment: Payment,
    /// False when an earlier callback already completed the payment.
    pub newly_granted: bool,
}

pub struct VerifyPaymentHandler {
    payments: Arc<dyn PaymentRepository>,
    plans: Arc<dyn PlanRepository>,
    email: Arc<dyn EmailSender>,
    verifier: Option<PaymentSignatureVerifier>,
}

impl VerifyPaymentHandler {
    /// `verifier` is `None` when no gateway secret is configured.
    pub fn new(
        payments: Arc<dyn PaymentRepository>,
        plans: Arc<dyn PlanRepository>,
        email: Arc<dyn EmailSender>,
        verifier: Option<PaymentSignatureVerifier>,
    ) -> Self {
        Self {
            payments,
            plans,
            email,
            verifier,
        }
    }

    pub async fn handle(&self, cmd: VerifyPaymentCommand) -> Result<VerifyPaymentResult, CommerceError> {
        let verifier = self.verifier.as_ref().ok_or(CommerceError::GatewayNotConfigured)?;

        // 1. Payment must exist and belong to the caller
        let payment = self
            .payments
            .find_by_id(&cmd.payment_id)
            .await?
            .filter(|p| p.is_owned_by(&cmd.user.id))
            .ok_or_else(|| CommerceError::payment_not_found(cmd.payment_id))?;

        // 2. Signature over the stored order id
        if payment.gateway_order_id != cmd.gateway_order_id
            || !verifier.verify(&payment.gateway_order_id, &cmd.gateway_payment_id, &cmd.signature)
        {
            tracing::warn!(
                payment_id = %payment.id,
                user_id = %cmd.user.id,
                "Payment signature mismatch"
            );
            return Err(CommerceError::invalid_signature());
        }

        // 3. Status gate
        match payment.status {
            PaymentStatus::Success => {
                tracing::debug!(payment_id = %payment.id, "Payment already verified");
                return Ok(VerifyPaymentResult {
                    payment,
                    newly_granted: false,
                });
            }
            PaymentStatus::Failed => {
                return Err(CommerceError::invalid_state(payment.status.as_str(), "verify payment"));
            }
            PaymentStatus::Pending => {}
        }

        // 4. Complete and grant atomically
        let grant = self.grant_for(&payment).await?;
        let completion = self
            .payments
            .complete(
                &payment.id,
                GatewayConfirmation {
                    gateway_payment_id: cmd.gateway_payment_id.clone(),
                    signature: cmd.signature.clone(),
                },
                grant,
            )
            .await?;

        let stored = self
            .payments
            .find_by_id(&payment.id)
            .await?
            .ok_or_else(|| CommerceError::payment_not_found(payment.id))?;

        match completion {
            Completion::Completed => {
                tracing::info!(
                    payment_id = %stored.id,
                    user_id = %cmd.user.id,
                    purpose = stored.purpose.type_str(),
                    "Payment verified and entitlement granted"
                );
                self.send_confirmation(&cmd.user, &stored);
                Ok(VerifyPaymentResult {
                    payment: stored,
                    newly_granted: true,
                })
            }
            // A concurrent callback won the race
            Completion::AlreadyCompleted if stored.status == PaymentStatus::Success => {
                Ok(VerifyPaymentResult {
                    payment: stored,
                    newly_granted: false,
                })
            }
            Completion::AlreadyCompleted => Err(CommerceError::invalid_state(
                stored.status.as_str(),
                "verify payment",
            )),
        }
    }

    async fn grant_for(&self, payment: &Payment) -> Result<Grant, CommerceError> {
        if let Some((kind, item_id)) = payment.purpose.content_item() {
            return Ok(Grant::Purchase(Purchase::new(payment.user_id, kind, item_id, payment.id)));
        }
        let PaymentPurpose::Subscription {
            plan_id,
            subscription_id,
        } = payment.purpose
        else {
            return Err(CommerceError::infrastructure("unknown payment purpose"));
        };

        // Plan may have been deactivated since checkout; its duration still applies
        let plan = self
            .plans
            .find_by_id(&plan_id)
            .await?
            .ok_or_else(|| CommerceError::plan_not_found(plan_id))?;
        let now = Timestamp::now();
        Ok(Grant::ActivateSubscription {
            subscription_id,
            start_date: now,
            end_date: now.add_days(plan.duration_days),
        })
    }

    fn send_confirmation(&self, user: &AuthenticatedUser, payment: &Payment) {
        let message = confirmation_email(user, payment);
        let email = Arc::clone(&self.email);
        let payment_id = payment.id;
        tokio::spawn(async move {
            if let Err(e) = email.send(message).await {
                tracing::warn!(payment_id = %payment_id, error = %e, "Failed to send payment confirmation");
            }
        });
    }
}

fn confirmation_email(user: &AuthenticatedUser, payment: &Payment) -> EmailMessage {
    let what = match payment.purpose {
        PaymentPurpose::Subscription { .. } => "Your subscription is now active.",
        _ => "Your purchase is now available in your library.",
    };
    let greeting = user.name.as_deref().unwrap_or("there");
    EmailMessage {
        to: user.email.clone(),
        subject: "Payment received".to_string(),
        text: format!(
            "Hi {},\n\nWe received your payment of {}.{:02} {} (ref {}).\n{}\n",
            greeting,
            payment.amount / 100,
            payment.amount % 100,
            payment.currency,
            payment.id,
            what
        ),
    }
}
