//! HTTP adapter for blogs and resources.
//!
//! - `GET /api/blogs`, `GET /api/resources` - published listings
//! - `GET /api/blogs/:slug`, `GET /api/resources/:slug` - item view
//! - `GET|POST /api/admin/{blogs|resources}` - admin listing and create
//! - `PUT|DELETE /api/admin/{blogs|resources}/:id` - admin update and delete

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::{admin_content_routes, content_routes};
