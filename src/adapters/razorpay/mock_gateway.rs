//! Mock payment gateway for testing.
//!
//! Returns sequential order ids, records every request and supports error
//! injection.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::ports::{CreateOrderRequest, GatewayOrder, PaymentGateway, PaymentGatewayError};

#[derive(Default)]
struct MockState {
    requests: Vec<CreateOrderRequest>,
    next_error: Option<PaymentGatewayError>,
}

/// In-process stand-in for the payment gateway.
#[derive(Clone, Default)]
pub struct MockPaymentGateway {
    inner: Arc<Mutex<MockState>>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Fail the next `create_order` call with `error`.
    pub fn fail_next(&self, error: PaymentGatewayError) {
        self.state().next_error = Some(error);
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<CreateOrderRequest> {
        self.state().requests.clone()
    }

    pub fn order_count(&self) -> usize {
        self.state().requests.len()
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_order(&self, request: CreateOrderRequest) -> Result<GatewayOrder, PaymentGatewayError> {
        let mut state = self.state();
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }
        let order = GatewayOrder {
            id: format!("order_mock_{}", state.requests.len() + 1),
            amount: request.amount,
            currency: request.currency.clone(),
        };
        state.requests.push(request);
        Ok(order)
    }

    fn public_key_id(&self) -> Option<String> {
        Some("rzp_test_mock".to_string())
    }
}
