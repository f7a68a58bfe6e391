//! HTTP adapter for comments and bookmarks.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::engagement_routes;
