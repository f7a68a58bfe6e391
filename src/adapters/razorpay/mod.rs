//! Razorpay payment gateway adapter.
//!
//! # Security
//!
//! - Key secret is held in `secrecy::SecretString` and never logged
//! - Checkout signatures are verified with HMAC-SHA256 and constant-time
//!   comparison (see `domain::commerce::PaymentSignatureVerifier`)
//!
//! # Configuration
//!
//! - `FOLIO__PAYMENT__RAZORPAY_KEY_ID`
//! - `FOLIO__PAYMENT__RAZORPAY_KEY_SECRET`

mod mock_gateway;
mod razorpay_gateway;

pub use mock_gateway::MockPaymentGateway;
pub use razorpay_gateway::{RazorpayConfig, RazorpayGateway};
