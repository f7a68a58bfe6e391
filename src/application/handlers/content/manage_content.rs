//! Admin command handlers for creating, updating and deleting content.

use std::sync::Arc;

use crate::application::handlers::media::discard_object;
use crate::domain::content::{ContentDraft, ContentItem, ContentKind, ContentPatch};
use crate::domain::foundation::{ContentId, DomainError, UserId};
use crate::ports::{ContentRepository, ObjectStorage};

use super::get_content::content_not_found;

#[derive(Debug, Clone)]
pub struct CreateContentCommand {
    pub kind: ContentKind,
    pub author_id: UserId,
    pub draft: ContentDraft,
}

pub struct CreateContentHandler {
    content: Arc<dyn ContentRepository>,
}

impl CreateContentHandler {
    pub fn new(content: Arc<dyn ContentRepository>) -> Self {
        Self { content }
    }

    pub async fn handle(&self, cmd: CreateContentCommand) -> Result<ContentItem, DomainError> {
        let item = ContentItem::create(cmd.kind, cmd.draft, cmd.author_id)?;
        self.content.insert(&item).await?;
        tracing::info!(item_id = %item.id, kind = %item.kind, slug = %item.slug, "Content created");
        Ok(item)
    }
}

#[derive(Debug, Clone)]
pub struct UpdateContentCommand {
    pub kind: ContentKind,
    pub id: ContentId,
    pub patch: ContentPatch,
}

pub struct UpdateContentHandler {
    content: Arc<dyn ContentRepository>,
    storage: Arc<dyn ObjectStorage>,
}

impl UpdateContentHandler {
    pub fn new(content: Arc<dyn ContentRepository>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { content, storage }
    }

    pub async fn handle(&self, cmd: UpdateContentCommand) -> Result<ContentItem, DomainError> {
        let mut item = self
            .content
            .find_by_id(cmd.kind, &cmd.id)
            .await?
            .ok_or_else(|| content_not_found(cmd.kind, cmd.id))?;

        let replaced_cover = item.apply(cmd.patch)?;
        self.content.update(&item).await?;
        tracing::info!(item_id = %item.id, "Content updated");

        // Only after the new state is saved.
        if let Some(old_key) = replaced_cover {
            discard_object(self.storage.as_ref(), &old_key).await;
        }

        Ok(item)
    }
}

#[derive(Debug, Clone)]
pub struct DeleteContentCommand {
    pub kind: ContentKind,
    pub id: ContentId,
}

pub struct DeleteContentHandler {
    content: Arc<dyn ContentRepository>,
    storage: Arc<dyn ObjectStorage>,
}

impl DeleteContentHandler {
    pub fn new(content: Arc<dyn ContentRepository>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { content, storage }
    }

    pub async fn handle(&self, cmd: DeleteContentCommand) -> Result<(), DomainError> {
        let item = self
            .content
            .find_by_id(cmd.kind, &cmd.id)
            .await?
            .ok_or_else(|| content_not_found(cmd.kind, cmd.id))?;

        if !self.content.delete(cmd.kind, &cmd.id).await? {
            return Err(content_not_found(cmd.kind, cmd.id));
        }
        tracing::info!(item_id = %cmd.id, kind = %cmd.kind, "Content deleted");

        if let Some(cover) = item.cover_image {
            discard_object(self.storage.as_ref(), &cover).await;
        }
        Ok(())
    }
}
