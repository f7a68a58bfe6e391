//! Content item aggregate (blog post or resource).
//!
//! # Invariants
//!
//! - `price` is `Some(p)` with `p > 0` iff `access_type == Paid`
//! - `title` is non-empty, `slug` is well-formed
//! - `download_url` only exists on resources
//! - tags are trimmed, lower-cased and unique

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ContentId, Timestamp, UserId, ValidationError};

use super::{AccessType, ContentKind, Slug};

/// Maximum price in whole currency units.
pub const MAX_PRICE: i64 = 10_000_000;

const MAX_TITLE_LEN: usize = 200;
const MAX_TAGS: usize = 10;
const MAX_TAG_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: ContentId,
    pub kind: ContentKind,
    pub title: String,
    pub slug: Slug,
    pub excerpt: Option<String>,
    pub body: String,
    pub access_type: AccessType,
    pub price: Option<i64>,
    pub tags: Vec<String>,
    pub cover_image: Option<String>,
    pub download_url: Option<String>,
    pub published: bool,
    pub author_id: UserId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fields supplied when creating an item.
#[derive(Debug, Clone, Default)]
pub struct ContentDraft {
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub body: String,
    pub access_type: Option<AccessType>,
    pub price: Option<i64>,
    pub tags: Vec<String>,
    pub cover_image: Option<String>,
    pub download_url: Option<String>,
    pub published: bool,
}

/// Partial update; `None` leaves a field unchanged.
///
/// Nested options distinguish "unchanged" from "clear".
#[derive(Debug, Clone, Default)]
pub struct ContentPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<Option<String>>,
    pub body: Option<String>,
    pub access_type: Option<AccessType>,
    pub price: Option<Option<i64>>,
    pub tags: Option<Vec<String>>,
    pub cover_image: Option<Option<String>>,
    pub download_url: Option<Option<String>>,
    pub published: Option<bool>,
}

impl ContentItem {
    /// Builds a new item from a draft, validating every invariant.
    pub fn create(
        kind: ContentKind,
        draft: ContentDraft,
        author_id: UserId,
    ) -> Result<Self, ValidationError> {
        let title = validate_title(&draft.title)?;
        let slug = match draft.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(explicit) => Slug::parse(explicit)?,
            None => Slug::from_title(&title)?,
        };
        let access_type = draft.access_type.unwrap_or(AccessType::Free);
        validate_pricing(access_type, draft.price)?;
        validate_download_url(kind, draft.download_url.as_deref())?;

        let now = Timestamp::now();
        Ok(Self {
            id: ContentId::new(),
            kind,
            title,
            slug,
            excerpt: normalize_optional(draft.excerpt),
            body: draft.body,
            access_type,
            price: draft.price,
            tags: normalize_tags(draft.tags)?,
            cover_image: normalize_optional(draft.cover_image),
            download_url: normalize_optional(draft.download_url),
            published: draft.published,
            author_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a patch. Returns the previous cover image key when it was replaced or cleared.
    pub fn apply(&mut self, patch: ContentPatch) -> Result<Option<String>, ValidationError> {
        let title = match patch.title {
            Some(title) => validate_title(&title)?,
            None => self.title.clone(),
        };
        let slug = match patch.slug {
            Some(slug) => Slug::parse(slug.trim())?,
            None => self.slug.clone(),
        };
        let access_type = patch.access_type.unwrap_or(self.access_type);
        let price = match patch.price {
            Some(price) => price,
            // Switching away from PAID drops the stale price.
            None if access_type.requires_price() => self.price,
            None => None,
        };
        validate_pricing(access_type, price)?;
        let download_url = match patch.download_url {
            Some(url) => normalize_optional(url),
            None => self.download_url.clone(),
        };
        validate_download_url(self.kind, download_url.as_deref())?;
        let tags = match patch.tags {
            Some(tags) => normalize_tags(tags)?,
            None => self.tags.clone(),
        };

        let mut replaced_cover = None;
        if let Some(cover) = patch.cover_image {
            let cover = normalize_optional(cover);
            if cover != self.cover_image {
                replaced_cover = self.cover_image.take();
            }
            self.cover_image = cover;
        }

        self.title = title;
        self.slug = slug;
        if let Some(excerpt) = patch.excerpt {
            self.excerpt = normalize_optional(excerpt);
        }
        if let Some(body) = patch.body {
            self.body = body;
        }
        self.access_type = access_type;
        self.price = price;
        self.tags = tags;
        self.download_url = download_url;
        if let Some(published) = patch.published {
            self.published = published;
        }
        self.updated_at = Timestamp::now();

        Ok(replaced_cover)
    }

    /// True when the item can be bought one-time.
    pub fn is_purchasable(&self) -> bool {
        self.access_type == AccessType::Paid && self.price.is_some_and(|p| p > 0)
    }
}

fn validate_title(title: &str) -> Result<String, ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::empty_field("title"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::invalid_format(
            "title",
            format!("must be at most {} characters", MAX_TITLE_LEN),
        ));
    }
    Ok(title.to_string())
}

/// Enforces "price required iff PAID".
pub fn validate_pricing(access_type: AccessType, price: Option<i64>) -> Result<(), ValidationError> {
    match (access_type.requires_price(), price) {
        (true, None) => Err(ValidationError::empty_field("price")),
        (true, Some(p)) if !(1..=MAX_PRICE).contains(&p) => {
            Err(ValidationError::out_of_range("price", 1, MAX_PRICE, p))
        }
        (false, Some(_)) => Err(ValidationError::invalid_format(
            "price",
            format!("only PAID content can have a price, got {}", access_type),
        )),
        _ => Ok(()),
    }
}

fn validate_download_url(kind: ContentKind, url: Option<&str>) -> Result<(), ValidationError> {
    match url {
        Some(url) if !url.trim().is_empty() && kind == ContentKind::Blog => Err(
            ValidationError::invalid_format("downloadUrl", "only resources have a download URL"),
        ),
        _ => Ok(()),
    }
}

/// Trims, lower-cases and de-duplicates tags, preserving first-seen order.
pub fn normalize_tags(tags: Vec<String>) -> Result<Vec<String>, ValidationError> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if tag.is_empty() || normalized.contains(&tag) {
            continue;
        }
        if tag.chars().count() > MAX_TAG_LEN {
            return Err(ValidationError::invalid_format(
                "tags",
                format!("tag '{}' exceeds {} characters", tag, MAX_TAG_LEN),
            ));
        }
        normalized.push(tag);
    }
    if normalized.len() > MAX_TAGS {
        return Err(ValidationError::out_of_range(
            "tags",
            0,
            MAX_TAGS as i64,
            normalized.len() as i64,
        ));
    }
    Ok(normalized)
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
