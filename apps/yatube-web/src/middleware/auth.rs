//! Session extraction: who is making the request.
//!
//! A session is a signed token carried in the `yatube_session` cookie (set at
//! login) or in an `Authorization: Bearer` header.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header};
use std::future::{Ready, ready};
use std::sync::Arc;

use yatube_core::Actor;
use yatube_core::ports::{AuthError, TokenClaims, TokenService};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "yatube_session";

/// Login page used for redirects.
pub const LOGIN_PATH: &str = "/auth/login/";

/// Authenticated user identity extractor.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: uuid::Uuid,
    pub username: String,
    pub roles: Vec<String>,
}

impl Identity {
    /// Check if the user has a specific role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn actor(&self) -> Actor {
        Actor::user(self.user_id, self.username.clone())
    }
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
            roles: claims.roles,
        }
    }
}

/// Error type for authentication failures.
#[derive(Debug)]
pub struct AuthenticationError(pub AuthError);

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match &self.0 {
            AuthError::TokenExpired => actix_web::http::StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken(_) => actix_web::http::StatusCode::UNAUTHORIZED,
            AuthError::MissingAuth => actix_web::http::StatusCode::UNAUTHORIZED,
            _ => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        use yatube_shared::ErrorResponse;

        let error = match &self.0 {
            AuthError::TokenExpired => ErrorResponse::new(401, "Token Expired")
                .with_detail("Your session has expired. Please log in again."),
            AuthError::InvalidToken(msg) => {
                ErrorResponse::new(401, "Invalid Token").with_detail(msg.clone())
            }
            AuthError::MissingAuth => ErrorResponse::new(401, "Authentication Required")
                .with_detail("Log in or provide a Bearer token in the Authorization header."),
            _ => ErrorResponse::internal_error(),
        };

        actix_web::HttpResponse::build(self.status_code()).json(error)
    }
}

/// Raw session token from a Bearer Authorization header, else from the session cookie.
///
/// Other Authorization schemes are not ours to interpret and leave the cookie in charge.
fn session_token(req: &HttpRequest) -> Result<String, AuthError> {
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if let Some(token) = bearer {
        return Ok(token.to_string());
    }

    req.cookie(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(AuthError::MissingAuth)
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // Get token service from app data
        let token_service = match req.app_data::<actix_web::web::Data<Arc<dyn TokenService>>>() {
            Some(service) => service,
            None => {
                tracing::error!("TokenService not found in app data");
                return ready(Err(AuthenticationError(AuthError::InvalidToken(
                    "Server configuration error".to_string(),
                ))));
            }
        };

        let token = match session_token(req) {
            Ok(token) => token,
            Err(e) => return ready(Err(AuthenticationError(e))),
        };

        // Validate token
        match token_service.validate_token(&token) {
            Ok(claims) => ready(Ok(Identity::from(claims))),
            Err(e) => ready(Err(AuthenticationError(e))),
        }
    }
}

/// Optional identity extractor - doesn't fail if not authenticated.
///
/// HTML pages use this: a missing, expired or forged session is an anonymous visitor.
pub struct OptionalIdentity(pub Option<Identity>);

impl OptionalIdentity {
    pub fn actor(&self) -> Actor {
        self.0.as_ref().map(Identity::actor).unwrap_or_default()
    }

    /// Username shown in the page header.
    pub fn username(&self) -> Option<String> {
        self.0.as_ref().map(|i| i.username.clone())
    }
}

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        match Identity::from_request(req, payload).into_inner() {
            Ok(identity) => ready(Ok(OptionalIdentity(Some(identity)))),
            Err(AuthenticationError(AuthError::MissingAuth)) => ready(Ok(OptionalIdentity(None))),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unusable session");
                ready(Ok(OptionalIdentity(None)))
            }
        }
    }
}

/// Cookie carrying a freshly issued session token.
pub fn session_cookie(token: String, max_age_seconds: i64) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(max_age_seconds))
        .finish()
}

/// Cookie that clears the session in the browser.
pub fn expired_session_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish();
    cookie.make_removal();
    cookie
}

/// `/auth/login/?next=<path>`, leaving the slashes of `path` readable.
pub fn login_url(next: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(next.as_bytes()).collect();
    format!("{LOGIN_PATH}?next={}", encoded.replace("%2F", "/"))
}

/// Accept only local redirect targets after login.
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
        _ => "/",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_url_keeps_slashes() {
        assert_eq!(login_url("/create/"), "/auth/login/?next=/create/");
        assert_eq!(login_url("/posts/1/edit/"), "/auth/login/?next=/posts/1/edit/");
        assert_eq!(login_url("/?page=2"), "/auth/login/?next=/%3Fpage%3D2");
    }

    #[test]
    fn test_safe_next() {
        assert_eq!(safe_next(Some("/create/")), "/create/");
        assert_eq!(safe_next(Some("//evil.example/")), "/");
        assert_eq!(safe_next(Some("https://evil.example/")), "/");
        assert_eq!(safe_next(None), "/");
    }

    #[test]
    fn test_session_token_sources() {
        use actix_web::test::TestRequest;

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer header-token"))
            .cookie(Cookie::new(SESSION_COOKIE, "cookie-token"))
            .to_http_request();
        assert_eq!(session_token(&req).unwrap(), "header-token");

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic YXV0aDpzZWNyZXQ="))
            .cookie(Cookie::new(SESSION_COOKIE, "cookie-token"))
            .to_http_request();
        assert_eq!(session_token(&req).unwrap(), "cookie-token");

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic YXV0aDpzZWNyZXQ="))
            .to_http_request();
        assert!(matches!(session_token(&req), Err(AuthError::MissingAuth)));
    }

    #[test]
    fn test_identity_roles_and_actor() {
        let identity = Identity {
            user_id: uuid::Uuid::new_v4(),
            username: "leo".to_string(),
            roles: vec!["user".to_string(), "admin".to_string()],
        };
        assert!(identity.has_role("admin"));
        assert!(!identity.has_role("moderator"));
        assert_eq!(identity.actor().username(), Some("leo"));
        assert!(OptionalIdentity(None).actor() == Actor::Anonymous);
    }
}
