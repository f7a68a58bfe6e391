//! URL slug value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Maximum slug length in characters.
pub const MAX_SLUG_LEN: usize = 80;

/// Lower-case ASCII slug made of `[a-z0-9]` runs separated by single dashes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Validates an explicit slug.
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::empty_field("slug"));
        }
        if value.len() > MAX_SLUG_LEN {
            return Err(ValidationError::invalid_format(
                "slug",
                format!("must be at most {} characters", MAX_SLUG_LEN),
            ));
        }
        let well_formed = value
            .split('-')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));
        if !well_formed {
            return Err(ValidationError::invalid_format(
                "slug",
                "use lower-case letters, digits and single dashes",
            ));
        }
        Ok(Self(value))
    }

    /// Derives a slug from a free-form title.
    pub fn from_title(title: &str) -> Result<Self, ValidationError> {
        let mut slug = String::with_capacity(title.len());
        let mut pending_dash = false;

        for ch in title.chars() {
            if !ch.is_ascii_alphanumeric() {
                pending_dash = true;
                continue;
            }
            let dash = pending_dash && !slug.is_empty();
            if slug.len() + usize::from(dash) + 1 > MAX_SLUG_LEN {
                break;
            }
            if dash {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        }

        if slug.is_empty() {
            return Err(ValidationError::invalid_format(
                "title",
                "must contain at least one letter or digit",
            ));
        }
        Self::parse(slug)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
