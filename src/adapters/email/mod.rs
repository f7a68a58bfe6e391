//! Email adapters.
//!
//! - `ResendEmailSender` - Resend HTTP API (production)
//! - `LoggingEmailSender` - logs instead of sending (no API key configured)
//! - `RecordingEmailSender` - captures messages (tests)

mod logging_sender;
mod resend_sender;

pub use logging_sender::{LoggingEmailSender, RecordingEmailSender};
pub use resend_sender::ResendEmailSender;
