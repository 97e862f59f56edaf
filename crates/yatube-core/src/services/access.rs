//! Access control: who may create and who may edit posts.

use uuid::Uuid;

use crate::domain::{Post, User};

/// The identity a request is made on behalf of.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Actor {
    #[default]
    Anonymous,
    User { id: Uuid, username: String },
}

impl Actor {
    pub fn user(id: Uuid, username: impl Into<String>) -> Self {
        Self::User {
            id,
            username: username.into(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Actor::User { .. })
    }

    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Actor::User { id, .. } => Some(*id),
            Actor::Anonymous => None,
        }
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Actor::User { username, .. } => Some(username),
            Actor::Anonymous => None,
        }
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Actor::user(user.id, user.username.clone())
    }
}

/// Any authenticated actor may publish.
pub fn can_create(actor: &Actor) -> bool {
    actor.is_authenticated()
}

/// Only the author may edit a post.
pub fn can_edit(actor: &Actor, post: &Post) -> bool {
    actor.user_id() == Some(post.author_id)
}
