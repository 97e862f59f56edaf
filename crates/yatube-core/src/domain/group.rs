use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Group entity - a community that posts can be filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub title: String,
    /// URL-safe identifier, unique across groups.
    pub slug: String,
    pub description: String,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// A group that has not been stored yet; the store assigns the ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGroup {
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl NewGroup {
    pub fn new(
        title: impl Into<String>,
        slug: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            description: description.into(),
        }
    }

    /// Reject empty titles and slugs that would not survive in a URL path.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::invalid("title", "Обязательное поле."));
        }
        let slug_ok = !self.slug.is_empty()
            && self
                .slug
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !slug_ok {
            return Err(DomainError::invalid(
                "slug",
                "Slug может содержать только латинские буквы, цифры, дефис и подчёркивание.",
            ));
        }
        Ok(())
    }
}
