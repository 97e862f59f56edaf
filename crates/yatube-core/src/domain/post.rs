use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Group, User};

/// Number of characters of the text shown when a post is displayed.
pub const POST_PREVIEW_CHARS: usize = 15;

/// Post entity - a short text published by its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// Set at creation and never reassigned.
    pub author_id: Uuid,
    pub group_id: Option<i64>,
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preview: String = self.text.chars().take(POST_PREVIEW_CHARS).collect();
        f.write_str(&preview)
    }
}

/// A post that has not been stored yet; the store assigns the ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub author_id: Uuid,
    pub text: String,
    pub group_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl NewPost {
    pub fn new(author_id: Uuid, text: impl Into<String>, group_id: Option<i64>) -> Self {
        Self {
            author_id,
            text: text.into(),
            group_id,
            created_at: Utc::now(),
        }
    }
}

/// A post together with the author and group it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCard {
    pub post: Post,
    pub author: User,
    pub group: Option<Group>,
}
