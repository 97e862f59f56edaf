//! Signed session tokens.
//!
//! A session is an HS256 JWT naming the user (`sub`), their username and their
//! roles. It lives for `session_hours`, and the login cookie carrying it is given
//! the same lifetime, so the browser drops the cookie when the token lapses.

use std::env;

use chrono::{TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use yatube_core::ports::{AuthError, TokenClaims, TokenService};

/// Signing secret used when `JWT_SECRET` is unset. Only fit for development.
const DEV_SECRET: &str = "change-me-in-production";

const DEFAULT_SESSION_HOURS: i64 = 24;

/// Session signing settings.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub session_hours: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEV_SECRET.to_string(),
            session_hours: DEFAULT_SESSION_HOURS,
            issuer: "yatube".to_string(),
        }
    }
}

impl JwtConfig {
    /// Read `JWT_SECRET`, `JWT_EXPIRATION_HOURS` and `JWT_ISSUER`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let config = Self {
            secret: env::var("JWT_SECRET")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.secret),
            session_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|s| s.trim().parse::<i64>().ok())
                .filter(|hours| *hours > 0)
                .unwrap_or(defaults.session_hours),
            issuer: env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
        };

        if config.uses_dev_secret() {
            if matches!(env::var("RUST_ENV").as_deref(), Ok("production" | "prod")) {
                tracing::error!("JWT_SECRET is unset in production; anyone can forge a session");
            } else {
                tracing::warn!("JWT_SECRET is unset; signing sessions with the development secret");
            }
        }

        config
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.secret == DEV_SECRET
    }
}

/// Token payload.
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: Uuid,
    username: String,
    roles: Vec<String>,
    iat: i64,
    exp: i64,
    iss: String,
}

impl From<SessionClaims> for TokenClaims {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            roles: claims.roles,
            exp: claims.exp,
        }
    }
}

/// Issues and checks session tokens.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    lifetime: TimeDelta,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iat", "iss", "sub"]);
        // The cookie expires exactly at `exp`; the token should not outlive it.
        validation.leeway = 0;

        let lifetime = TimeDelta::try_hours(config.session_hours)
            .unwrap_or_else(|| TimeDelta::hours(DEFAULT_SESSION_HOURS));

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            issuer: config.issuer,
            lifetime,
        }
    }
}

impl TokenService for JwtTokenService {
    fn generate_token(
        &self,
        user_id: Uuid,
        username: &str,
        roles: Vec<String>,
    ) -> Result<String, AuthError> {
        let issued_at = Utc::now();
        let claims = SessionClaims {
            sub: user_id,
            username: username.to_string(),
            roles,
            iat: issued_at.timestamp(),
            exp: (issued_at + self.lifetime).timestamp(),
            iss: self.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            })?;

        if data.claims.username.is_empty() {
            return Err(AuthError::InvalidToken("Session names no user".to_string()));
        }

        Ok(data.claims.into())
    }

    fn expiration_seconds(&self) -> i64 {
        self.lifetime.num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sessions(secret: &str, session_hours: i64) -> JwtTokenService {
        JwtTokenService::new(JwtConfig {
            secret: secret.to_string(),
            session_hours,
            ..JwtConfig::default()
        })
    }

    fn user_roles() -> Vec<String> {
        vec!["user".to_string()]
    }

    #[test]
    fn test_session_names_user_and_roles() {
        let service = sessions("blog-secret", 1);
        let leo = Uuid::new_v4();
        let roles = vec!["user".to_string(), "admin".to_string()];

        let token = service.generate_token(leo, "leo", roles.clone()).unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.user_id, leo);
        assert_eq!(claims.username, "leo");
        assert_eq!(claims.roles, roles);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_session_from_other_deployment_is_rejected() {
        let ours = sessions("blog-secret", 1);
        let theirs = sessions("someone-else", 1);

        let token = theirs
            .generate_token(Uuid::new_v4(), "auth", user_roles())
            .unwrap();
        assert!(matches!(
            ours.validate_token(&token),
            Err(AuthError::InvalidToken(_))
        ));

        let renamed = JwtTokenService::new(JwtConfig {
            secret: "blog-secret".to_string(),
            issuer: "other-blog".to_string(),
            ..JwtConfig::default()
        });
        let token = renamed
            .generate_token(Uuid::new_v4(), "auth", user_roles())
            .unwrap();
        assert!(ours.validate_token(&token).is_err());
    }

    #[test]
    fn test_swapped_payload_is_rejected() {
        let service = sessions("blog-secret", 1);
        let auth = service
            .generate_token(Uuid::new_v4(), "auth", user_roles())
            .unwrap();
        let admin = service
            .generate_token(Uuid::new_v4(), "leo", vec!["admin".to_string()])
            .unwrap();

        // leo's claims under auth's signature.
        let auth_parts: Vec<&str> = auth.split('.').collect();
        let admin_parts: Vec<&str> = admin.split('.').collect();
        let forged = format!("{}.{}.{}", auth_parts[0], admin_parts[1], auth_parts[2]);

        assert!(matches!(
            service.validate_token(&forged),
            Err(AuthError::InvalidToken(_))
        ));
        assert!(matches!(
            service.validate_token("not-a-session"),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_lapsed_session_is_expired() {
        let service = sessions("blog-secret", -1);
        let token = service
            .generate_token(Uuid::new_v4(), "auth", user_roles())
            .unwrap();

        assert!(matches!(
            service.validate_token(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_cookie_lifetime_follows_session_hours() {
        assert_eq!(sessions("s", 2).expiration_seconds(), 7200);
        assert_eq!(
            JwtTokenService::new(JwtConfig::default()).expiration_seconds(),
            86400
        );
        assert!(JwtConfig::default().uses_dev_secret());
    }
}
