//! Domain-level error types.

use thiserror::Error;

use crate::forms::FormErrors;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} {key}")]
    NotFound {
        entity_type: &'static str,
        key: String,
    },

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Validation failed: {0}")]
    Validation(FormErrors),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity_type: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            key: key.to_string(),
        }
    }

    /// Validation failure carrying a single field message.
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = FormErrors::default();
        errors.add(field, message);
        Self::Validation(errors)
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    /// A unique key (username, group slug) is already taken.
    #[error("Unique constraint violated: {0}")]
    Duplicate(String),

    /// The row points at a user or group that does not exist.
    #[error("Foreign key violated: {0}")]
    MissingReference(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Duplicate(msg) => DomainError::Duplicate(msg),
            RepoError::NotFound => DomainError::Internal("Row vanished during update".to_string()),
            other => DomainError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_errors_map_to_domain_errors() {
        assert!(matches!(
            DomainError::from(RepoError::Duplicate("slug".to_string())),
            DomainError::Duplicate(_)
        ));
        assert!(matches!(
            DomainError::from(RepoError::MissingReference("author".to_string())),
            DomainError::Internal(_)
        ));
        assert!(matches!(
            DomainError::from(RepoError::Connection("refused".to_string())),
            DomainError::Internal(_)
        ));
    }
}
