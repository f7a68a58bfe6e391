//! PostgreSQL implementations of CommentRepository and BookmarkRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::content::ContentKind;
use crate::domain::engagement::{Bookmark, Comment};
use crate::domain::foundation::{CommentId, ContentId, DomainError, Timestamp, UserId};
use crate::ports::{BookmarkRepository, CommentRepository};

use super::corrupt_column;

fn parse_kind(value: &str) -> Result<ContentKind, DomainError> {
    ContentKind::parse(value).ok_or_else(|| corrupt_column("kind", value))
}

pub struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
    id: Uuid,
    kind: String,
    item_id: Uuid,
    user_id: Uuid,
    body: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<CommentRow> for Comment {
    type Error = DomainError;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        Ok(Comment {
            id: CommentId::from_uuid(row.id),
            kind: parse_kind(&row.kind)?,
            item_id: ContentId::from_uuid(row.item_id),
            user_id: UserId::from_uuid(row.user_id),
            body: row.body,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn insert(&self, comment: &Comment) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, kind, item_id, user_id, body, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(comment.id.as_uuid())
        .bind(comment.kind.as_str())
        .bind(comment.item_id.as_uuid())
        .bind(comment.user_id.as_uuid())
        .bind(&comment.body)
        .bind(comment.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to insert comment", e))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, DomainError> {
        let row: Option<CommentRow> = sqlx::query_as(
            "SELECT id, kind, item_id, user_id, body, created_at FROM comments WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch comment", e))?;
        row.map(Comment::try_from).transpose()
    }

    async fn list_for_item(&self, kind: ContentKind, item_id: &ContentId) -> Result<Vec<Comment>, DomainError> {
        let rows: Vec<CommentRow> = sqlx::query_as(
            r#"
            SELECT id, kind, item_id, user_id, body, created_at FROM comments
            WHERE kind = $1 AND item_id = $2
            ORDER BY created_at ASC
            "#,
        )
        .bind(kind.as_str())
        .bind(item_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list comments", e))?;
        rows.into_iter().map(Comment::try_from).collect()
    }

    async fn delete(&self, id: &CommentId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to delete comment", e))?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct PostgresBookmarkRepository {
    pool: PgPool,
}

impl PostgresBookmarkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BookmarkRow {
    user_id: Uuid,
    kind: String,
    item_id: Uuid,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl BookmarkRepository for PostgresBookmarkRepository {
    async fn toggle(&self, bookmark: &Bookmark) -> Result<bool, DomainError> {
        let removed = sqlx::query("DELETE FROM bookmarks WHERE user_id = $1 AND item_id = $2")
            .bind(bookmark.user_id.as_uuid())
            .bind(bookmark.item_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to remove bookmark", e))?;
        if removed.rows_affected() > 0 {
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO bookmarks (user_id, kind, item_id, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, item_id) DO NOTHING
            "#,
        )
        .bind(bookmark.user_id.as_uuid())
        .bind(bookmark.kind.as_str())
        .bind(bookmark.item_id.as_uuid())
        .bind(bookmark.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to add bookmark", e))?;
        Ok(true)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Bookmark>, DomainError> {
        let rows: Vec<BookmarkRow> = sqlx::query_as(
            r#"
            SELECT user_id, kind, item_id, created_at FROM bookmarks
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list bookmarks", e))?;

        rows.into_iter()
            .map(|row| {
                Ok(Bookmark {
                    user_id: UserId::from_uuid(row.user_id),
                    kind: parse_kind(&row.kind)?,
                    item_id: ContentId::from_uuid(row.item_id),
                    created_at: Timestamp::from_datetime(row.created_at),
                })
            })
            .collect()
    }
}
