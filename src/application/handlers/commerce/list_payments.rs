//! ListPaymentsHandler - admin payment ledger.

use std::sync::Arc;

use crate::domain::commerce::{CommerceError, Payment, PaymentStatus};
use crate::ports::PaymentRepository;

pub const DEFAULT_PAYMENT_LIMIT: u32 = 100;
pub const MAX_PAYMENT_LIMIT: u32 = 500;

#[derive(Debug, Clone, Default)]
pub struct ListPaymentsQuery {
    pub status: Option<PaymentStatus>,
    pub limit: Option<u32>,
}

pub struct ListPaymentsHandler {
    payments: Arc<dyn PaymentRepository>,
}

impl ListPaymentsHandler {
    pub fn new(payments: Arc<dyn PaymentRepository>) -> Self {
        Self { payments }
    }

    /// Newest first.
    pub async fn handle(&self, query: ListPaymentsQuery) -> Result<Vec<Payment>, CommerceError> {
        let limit = query
            .limit
            .unwrap_or(DEFAULT_PAYMENT_LIMIT)
            .clamp(1, MAX_PAYMENT_LIMIT);
        Ok(self.payments.list(query.status, limit).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::commerce::test_support::*;
    use crate::domain::commerce::PaymentPurpose;
    use crate::domain::content::ContentKind;
    use crate::domain::foundation::{ContentId, PaymentId};

    async fn seed(fx: &Fixture, n: usize) -> Vec<Payment> {
        let mut out = Vec::new();
        for i in 0..n {
            let payment = Payment::pending(
                PaymentId::new(),
                fx.buyer.id,
                100,
                "INR",
                format!("order_{}", i),
                PaymentPurpose::content(ContentKind::Blog, ContentId::new()),
            );
            PaymentRepository::insert(&fx.store, &payment).await.unwrap();
            out.push(payment);
        }
        out
    }

    #[tokio::test]
    async fn filters_by_status() {
        let fx = Fixture::new().await;
        let payments = seed(&fx, 3).await;
        fx.store.mark_failed(&payments[0].id).await.unwrap();

        let handler = ListPaymentsHandler::new(Arc::new(fx.store.clone()));
        let failed = handler
            .handle(ListPaymentsQuery {
                status: Some(PaymentStatus::Failed),
                limit: None,
            })
            .await
            .unwrap();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].id, payments[0].id);

        let all = handler.handle(ListPaymentsQuery::default()).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn zero_limit_still_returns_a_row() {
        let fx = Fixture::new().await;
        seed(&fx, 2).await;

        let rows = ListPaymentsHandler::new(Arc::new(fx.store.clone()))
            .handle(ListPaymentsQuery {
                status: None,
                limit: Some(0),
            })
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }
}
