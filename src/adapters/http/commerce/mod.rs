//! HTTP adapter for orders, payment callbacks and subscriptions.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::commerce_routes;
