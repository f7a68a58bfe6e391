//! Comment handlers.

use std::collections::HashMap;
use std::sync::Arc;

use crate::application::handlers::content::{content_not_found, is_visible_to};
use crate::domain::content::{ContentItem, ContentKind};
use crate::domain::engagement::Comment;
use crate::domain::foundation::{AuthenticatedUser, CommentId, ContentId, DomainError, ErrorCode, UserId};
use crate::ports::{CommentRepository, ContentRepository, UserRepository};

/// A comment with its author's display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    pub comment: Comment,
    pub author_name: Option<String>,
}

async fn visible_item(
    content: &dyn ContentRepository,
    kind: ContentKind,
    item_id: &ContentId,
    viewer: Option<&AuthenticatedUser>,
) -> Result<ContentItem, DomainError> {
    content
        .find_by_id(kind, item_id)
        .await?
        .filter(|item| is_visible_to(item, viewer))
        .ok_or_else(|| content_not_found(kind, item_id))
}

#[derive(Debug, Clone)]
pub struct ListCommentsQuery {
    pub kind: ContentKind,
    pub item_id: ContentId,
    pub viewer: Option<AuthenticatedUser>,
}

pub struct ListCommentsHandler {
    content: Arc<dyn ContentRepository>,
    comments: Arc<dyn CommentRepository>,
    users: Arc<dyn UserRepository>,
}

impl ListCommentsHandler {
    pub fn new(
        content: Arc<dyn ContentRepository>,
        comments: Arc<dyn CommentRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            content,
            comments,
            users,
        }
    }

    /// Oldest first.
    pub async fn handle(&self, query: ListCommentsQuery) -> Result<Vec<CommentView>, DomainError> {
        visible_item(self.content.as_ref(), query.kind, &query.item_id, query.viewer.as_ref()).await?;
        let comments = self.comments.list_for_item(query.kind, &query.item_id).await?;

        let mut names: HashMap<UserId, Option<String>> = HashMap::new();
        let mut views = Vec::with_capacity(comments.len());
        for comment in comments {
            if !names.contains_key(&comment.user_id) {
                let name = self.users.find_by_id(&comment.user_id).await?.and_then(|u| u.name);
                names.insert(comment.user_id, name);
            }
            views.push(CommentView {
                author_name: names.get(&comment.user_id).cloned().flatten(),
                comment,
            });
        }
        Ok(views)
    }
}

#[derive(Debug, Clone)]
pub struct CreateCommentCommand {
    pub user: AuthenticatedUser,
    pub kind: ContentKind,
    pub item_id: ContentId,
    pub body: String,
}

pub struct CreateCommentHandler {
    content: Arc<dyn ContentRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl CreateCommentHandler {
    pub fn new(content: Arc<dyn ContentRepository>, comments: Arc<dyn CommentRepository>) -> Self {
        Self { content, comments }
    }

    pub async fn handle(&self, cmd: CreateCommentCommand) -> Result<CommentView, DomainError> {
        let item = visible_item(self.content.as_ref(), cmd.kind, &cmd.item_id, Some(&cmd.user)).await?;
        let comment = Comment::new(item.kind, item.id, cmd.user.id, &cmd.body)?;
        self.comments.insert(&comment).await?;

        tracing::info!(comment_id = %comment.id, item_id = %item.id, user_id = %cmd.user.id, "Comment added");
        Ok(CommentView {
            comment,
            author_name: cmd.user.name,
        })
    }
}

pub struct DeleteCommentHandler {
    comments: Arc<dyn CommentRepository>,
}

impl DeleteCommentHandler {
    pub fn new(comments: Arc<dyn CommentRepository>) -> Self {
        Self { comments }
    }

    pub async fn handle(&self, user: &AuthenticatedUser, id: CommentId) -> Result<(), DomainError> {
        let not_found = || DomainError::new(ErrorCode::CommentNotFound, format!("Comment not found: {}", id));
        let comment = self.comments.find_by_id(&id).await?.ok_or_else(not_found)?;

        if !comment.can_be_deleted_by(user) {
            return Err(DomainError::new(
                ErrorCode::Forbidden,
                "Only the author or an admin can delete this comment",
            ));
        }
        if !self.comments.delete(&id).await? {
            return Err(not_found());
        }
        tracing::info!(comment_id = %id, user_id = %user.id, "Comment deleted");
        Ok(())
    }
}
