//! Content domain - blogs, resources and the entitlement rules that gate them.

mod access_type;
mod entitlement;
mod item;
mod kind;
mod slug;

pub use access_type::AccessType;
pub use entitlement::{required_fact, resolve_access, Access, EntitlementFacts, Requirement};
pub use item::{normalize_tags, validate_pricing, ContentDraft, ContentItem, ContentPatch, MAX_PRICE};
pub use kind::ContentKind;
pub use slug::{Slug, MAX_SLUG_LEN};
