//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `account` - Registered users and moderation
//! - `content` - Blogs, resources and entitlement resolution
//! - `commerce` - Payments, purchases, subscriptions and signature verification
//! - `engagement` - Comments and bookmarks
//! - `media` - Upload validation and storage keys

pub mod account;
pub mod commerce;
pub mod content;
pub mod engagement;
pub mod foundation;
pub mod media;
