//! Error handling - HTML error pages for the site, RFC 7807 bodies for the API.

use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header::ContentType};
use askama::Template;
use std::collections::BTreeMap;
use std::fmt;

use yatube_core::error::{DomainError, RepoError};
use yatube_core::forms::FormErrors;
use yatube_shared::ErrorResponse;

use crate::templates::{ForbiddenTemplate, NotFoundTemplate, ServerErrorTemplate};

/// Errors of the HTML routes, rendered as `core/404.html`, `core/403.html`
/// or `core/500.html`.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Forbidden,
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl AppError {
    fn page(&self) -> Result<String, askama::Error> {
        match self {
            AppError::NotFound(path) => NotFoundTemplate {
                viewer: None,
                path: path.clone(),
            }
            .render(),
            AppError::Forbidden => ForbiddenTemplate { viewer: None }.render(),
            AppError::Internal(_) => ServerErrorTemplate { viewer: None }.render(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(detail) = self {
            tracing::error!("Internal error: {}", detail);
        }

        match self.page() {
            Ok(body) => HttpResponse::build(self.status_code())
                .content_type(ContentType::html())
                .body(body),
            Err(e) => {
                tracing::error!("Failed to render error page: {}", e);
                HttpResponse::build(self.status_code())
                    .content_type(ContentType::plaintext())
                    .body(self.status_code().to_string())
            }
        }
    }
}

// Conversion from domain errors. Validation and permission failures are
// normally handled by the route itself.
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, key } => {
                AppError::NotFound(format!("{} {} not found", entity_type, key))
            }
            DomainError::PermissionDenied | DomainError::Unauthorized => AppError::Forbidden,
            DomainError::Validation(errors) => {
                AppError::Internal(format!("Unhandled validation errors: {}", errors))
            }
            DomainError::Duplicate(msg) => AppError::Internal(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        DomainError::from(err).into()
    }
}

impl From<askama::Error> for AppError {
    fn from(err: askama::Error) -> Self {
        AppError::Internal(format!("Template error: {}", err))
    }
}

/// Errors of the `/api` routes, rendered as RFC 7807 JSON.
#[derive(Debug)]
pub enum ApiError {
    App(AppError),
    BadRequest(String),
    Conflict(String),
    Validation(FormErrors),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::App(err) => err.fmt(f),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Validation(errors) => write!(f, "Validation errors: {}", errors),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::App(err) => err.status_code(),
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            ApiError::App(AppError::NotFound(detail)) => ErrorResponse::not_found(detail),
            ApiError::App(AppError::Forbidden) => ErrorResponse::forbidden(),
            ApiError::App(AppError::Internal(detail)) => {
                // Log internal errors
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
            ApiError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            ApiError::Conflict(detail) => ErrorResponse::conflict(detail),
            ApiError::Validation(errors) => {
                let fields: BTreeMap<String, Vec<String>> = errors
                    .iter()
                    .map(|(field, messages)| (field.to_string(), messages.to_vec()))
                    .collect();
                ErrorResponse::unprocessable(fields)
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError::App(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(errors) => ApiError::Validation(errors),
            DomainError::Duplicate(msg) => ApiError::Conflict(msg),
            other => ApiError::App(other.into()),
        }
    }
}

/// Result type alias for HTML handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_pages() {
        let not_found: AppError = DomainError::not_found("Group", "missing").into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let denied: AppError = DomainError::PermissionDenied.into();
        assert_eq!(denied.status_code(), StatusCode::FORBIDDEN);

        let repo: AppError = RepoError::Connection("refused".to_string()).into();
        assert_eq!(repo.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_domain_errors_map_to_api_statuses() {
        let duplicate: ApiError = DomainError::Duplicate("slug".to_string()).into();
        assert_eq!(duplicate.status_code(), StatusCode::CONFLICT);

        let invalid: ApiError = DomainError::invalid("slug", "bad").into();
        assert_eq!(invalid.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let missing: ApiError = DomainError::not_found("Group", 1).into();
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
    }
}
