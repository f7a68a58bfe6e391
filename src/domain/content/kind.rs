//! Content kind: blog post or downloadable resource.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentKind {
    Blog,
    Resource,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Blog => "BLOG",
            ContentKind::Resource => "RESOURCE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "BLOG" => Some(ContentKind::Blog),
            "RESOURCE" => Some(ContentKind::Resource),
            _ => None,
        }
    }

    /// Human-readable label used in receipts and emails.
    pub fn label(&self) -> &'static str {
        match self {
            ContentKind::Blog => "blog",
            ContentKind::Resource => "resource",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(ContentKind::parse("blog"), Some(ContentKind::Blog));
        assert_eq!(ContentKind::parse("RESOURCE"), Some(ContentKind::Resource));
        assert_eq!(ContentKind::parse("video"), None);
    }
}
