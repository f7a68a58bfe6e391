//! Engagement handlers: comments and bookmarks.

mod bookmarks;
mod comments;

pub use bookmarks::{BookmarkedItem, ListBookmarksHandler, ToggleBookmarkCommand, ToggleBookmarkHandler};
pub use comments::{
    CommentView, CreateCommentCommand, CreateCommentHandler, DeleteCommentHandler, ListCommentsHandler,
    ListCommentsQuery,
};
