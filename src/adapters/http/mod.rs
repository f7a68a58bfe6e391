//! HTTP adapters - REST API implementations.
//!
//! Each area has its own DTOs, handlers and routes; `router` assembles them
//! behind the auth middleware and the tower-http layers.

pub mod admin;
pub mod commerce;
pub mod content;
pub mod engagement;
pub mod error;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use router::build_router;
pub use state::{AppState, Repositories};
