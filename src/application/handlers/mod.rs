//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod account;
pub mod commerce;
pub mod content;
pub mod engagement;
pub mod media;
