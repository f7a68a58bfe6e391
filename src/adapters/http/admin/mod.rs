//! HTTP adapter for the admin back office.
//!
//! Content CRUD, media, payment listing, user moderation and plans. All
//! routes require the ADMIN role.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::admin_routes;
