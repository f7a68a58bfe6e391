//! Engagement domain - comments and bookmarks.

mod bookmark;
mod comment;

pub use bookmark::Bookmark;
pub use comment::{Comment, MAX_COMMENT_LEN};
