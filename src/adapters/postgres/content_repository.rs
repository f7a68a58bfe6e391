//! PostgreSQL implementation of ContentRepository.
//!
//! Blogs and resources live in `content_items`, discriminated by `kind`. Slug
//! uniqueness per kind is enforced by `content_items_kind_slug_key`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::content::{AccessType, ContentItem, ContentKind, Slug};
use crate::domain::foundation::{ContentId, DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::{ContentQuery, ContentRepository, Page};

use super::{corrupt_column, to_bigint, unique_violation};

const SLUG_CONSTRAINT: &str = "content_items_kind_slug_key";

const SELECT_COLUMNS: &str = r#"
    SELECT id, kind, title, slug, excerpt, body, access_type, price, tags,
           cover_image, download_url, published, author_id, created_at, updated_at
    FROM content_items
"#;

pub struct PostgresContentRepository {
    pool: PgPool,
}

impl PostgresContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ContentRow {
    id: Uuid,
    kind: String,
    title: String,
    slug: String,
    excerpt: Option<String>,
    body: String,
    access_type: String,
    price: Option<i64>,
    tags: Vec<String>,
    cover_image: Option<String>,
    download_url: Option<String>,
    published: bool,
    author_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ContentRow> for ContentItem {
    type Error = DomainError;

    fn try_from(row: ContentRow) -> Result<Self, Self::Error> {
        let kind = ContentKind::parse(&row.kind).ok_or_else(|| corrupt_column("kind", &row.kind))?;
        let access_type =
            AccessType::parse(&row.access_type).ok_or_else(|| corrupt_column("access_type", &row.access_type))?;
        let slug = Slug::parse(row.slug.clone()).map_err(|_| corrupt_column("slug", &row.slug))?;

        Ok(ContentItem {
            id: ContentId::from_uuid(row.id),
            kind,
            title: row.title,
            slug,
            excerpt: row.excerpt,
            body: row.body,
            access_type,
            price: row.price,
            tags: row.tags,
            cover_image: row.cover_image,
            download_url: row.download_url,
            published: row.published,
            author_id: UserId::from_uuid(row.author_id),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn write_error(item: &ContentItem, context: &str, err: sqlx::Error) -> DomainError {
    if unique_violation(&err).as_deref() == Some(SLUG_CONSTRAINT) {
        return DomainError::new(
            ErrorCode::SlugTaken,
            format!("A {} with slug '{}' already exists", item.kind.label(), item.slug),
        );
    }
    DomainError::database(context, err)
}

#[async_trait]
impl ContentRepository for PostgresContentRepository {
    async fn insert(&self, item: &ContentItem) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO content_items (
                id, kind, title, slug, excerpt, body, access_type, price, tags,
                cover_image, download_url, published, author_id, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(item.id.as_uuid())
        .bind(item.kind.as_str())
        .bind(&item.title)
        .bind(item.slug.as_str())
        .bind(&item.excerpt)
        .bind(&item.body)
        .bind(item.access_type.as_str())
        .bind(item.price)
        .bind(&item.tags)
        .bind(&item.cover_image)
        .bind(&item.download_url)
        .bind(item.published)
        .bind(item.author_id.as_uuid())
        .bind(item.created_at.as_datetime())
        .bind(item.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(item, "Failed to insert content", e))?;
        Ok(())
    }

    async fn update(&self, item: &ContentItem) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE content_items SET
                title = $3,
                slug = $4,
                excerpt = $5,
                body = $6,
                access_type = $7,
                price = $8,
                tags = $9,
                cover_image = $10,
                download_url = $11,
                published = $12,
                updated_at = $13
            WHERE id = $1 AND kind = $2
            "#,
        )
        .bind(item.id.as_uuid())
        .bind(item.kind.as_str())
        .bind(&item.title)
        .bind(item.slug.as_str())
        .bind(&item.excerpt)
        .bind(&item.body)
        .bind(item.access_type.as_str())
        .bind(item.price)
        .bind(&item.tags)
        .bind(&item.cover_image)
        .bind(&item.download_url)
        .bind(item.published)
        .bind(item.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(item, "Failed to update content", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ContentNotFound,
                format!("Content not found: {}", item.id),
            ));
        }
        Ok(())
    }

    async fn delete(&self, kind: ContentKind, id: &ContentId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM content_items WHERE id = $1 AND kind = $2")
            .bind(id.as_uuid())
            .bind(kind.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to delete content", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_id(&self, kind: ContentKind, id: &ContentId) -> Result<Option<ContentItem>, DomainError> {
        let row: Option<ContentRow> = sqlx::query_as(&format!("{} WHERE id = $1 AND kind = $2", SELECT_COLUMNS))
            .bind(id.as_uuid())
            .bind(kind.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch content", e))?;
        row.map(ContentItem::try_from).transpose()
    }

    async fn find_by_slug(&self, kind: ContentKind, slug: &Slug) -> Result<Option<ContentItem>, DomainError> {
        let row: Option<ContentRow> = sqlx::query_as(&format!("{} WHERE kind = $1 AND slug = $2", SELECT_COLUMNS))
            .bind(kind.as_str())
            .bind(slug.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch content by slug", e))?;
        row.map(ContentItem::try_from).transpose()
    }

    async fn list(&self, query: &ContentQuery) -> Result<Page<ContentItem>, DomainError> {
        const FILTER: &str = r#"
            WHERE kind = $1
              AND ($2 OR published)
              AND ($3::TEXT IS NULL OR $3 = ANY(tags))
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM content_items {}", FILTER))
            .bind(query.kind.as_str())
            .bind(query.include_unpublished)
            .bind(&query.tag)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to count content", e))?;

        let rows: Vec<ContentRow> = sqlx::query_as(&format!(
            "{} {} ORDER BY created_at DESC LIMIT $4 OFFSET $5",
            SELECT_COLUMNS, FILTER
        ))
        .bind(query.kind.as_str())
        .bind(query.include_unpublished)
        .bind(&query.tag)
        .bind(i64::from(query.per_page))
        .bind(to_bigint(query.offset()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list content", e))?;

        Ok(Page {
            items: rows
                .into_iter()
                .map(ContentItem::try_from)
                .collect::<Result<_, _>>()?,
            total: u64::try_from(total).unwrap_or(0),
            page: query.page,
            per_page: query.per_page,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> ContentRow {
        let now = Utc::now();
        ContentRow {
            id: Uuid::new_v4(),
            kind: "RESOURCE".to_string(),
            title: "Starter Kit".to_string(),
            slug: "starter-kit".to_string(),
            excerpt: Some("Everything to begin".to_string()),
            body: "<p>Kit</p>".to_string(),
            access_type: "PAID".to_string(),
            price: Some(299),
            tags: vec!["rust".to_string(), "web".to_string()],
            cover_image: None,
            download_url: Some("https://files.example.com/kit.zip".to_string()),
            published: true,
            author_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn row_converts() {
        let item = ContentItem::try_from(row()).unwrap();
        assert_eq!(item.kind, ContentKind::Resource);
        assert_eq!(item.access_type, AccessType::Paid);
        assert_eq!(item.slug.as_str(), "starter-kit");
        assert_eq!(item.price, Some(299));
        assert_eq!(item.tags, vec!["rust", "web"]);
        assert_eq!(item.download_url.as_deref(), Some("https://files.example.com/kit.zip"));
    }

    #[test]
    fn every_access_type_round_trips_through_column() {
        for access in [AccessType::Free, AccessType::Paid, AccessType::Subscription] {
            let mut stored = row();
            stored.access_type = access.as_str().to_string();
            assert_eq!(ContentItem::try_from(stored).unwrap().access_type, access);
        }
    }

    #[test]
    fn corrupt_columns_are_database_errors() {
        let mut bad_kind = row();
        bad_kind.kind = "PODCAST".to_string();
        assert_eq!(ContentItem::try_from(bad_kind).unwrap_err().code, ErrorCode::DatabaseError);

        let mut bad_access = row();
        bad_access.access_type = "VIP".to_string();
        assert_eq!(ContentItem::try_from(bad_access).unwrap_err().code, ErrorCode::DatabaseError);

        let mut bad_slug = row();
        bad_slug.slug = "Not A Slug!".to_string();
        assert_eq!(ContentItem::try_from(bad_slug).unwrap_err().code, ErrorCode::DatabaseError);
    }
}
