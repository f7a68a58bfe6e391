//! Content handlers.
//!
//! ## Queries
//! - View an item by slug (through the entitlement resolver)
//! - List published items
//!
//! ## Commands (admin)
//! - Create, update and delete items

mod get_content;
mod list_content;
mod manage_content;

pub use get_content::{check_access, is_visible_to, ContentView, GetContentHandler, GetContentQuery};
pub use list_content::{ListContentHandler, ListContentQuery};
pub use manage_content::{
    CreateContentCommand, CreateContentHandler, DeleteContentCommand, DeleteContentHandler,
    UpdateContentCommand, UpdateContentHandler,
};

pub(crate) use get_content::content_not_found;
