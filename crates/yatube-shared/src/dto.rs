//! Data Transfer Objects - form bodies, query strings and API payloads.

use serde::{Deserialize, Serialize};

/// Body of the post create/edit form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostFormData {
    #[serde(default)]
    pub text: String,
    /// Selected group ID; the empty option submits `""`.
    #[serde(default)]
    pub group: Option<String>,
}

/// Body of the sign-up form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignupFormData {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

/// Body of the login form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginFormData {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// `?page=` on listing routes. Kept as a string so malformed values fall back to page 1.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// `?next=` on the login route.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// Request to create a community group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroupRequest {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
}

/// A group as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

/// Service health as reported by `/api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` when the entity store answers, `degraded` otherwise.
    pub status: String,
    pub version: String,
    /// RFC 3339 time of the check.
    pub timestamp: String,
}
