//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use yatube_core::services::DEFAULT_PAGE_SIZE;
use yatube_infra::JwtConfig;
use yatube_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs the blog on the in-memory store.
    pub database: Option<DatabaseConfig>,
    pub posts_per_page: u64,
    /// Users granted the `admin` role at login.
    pub admin_usernames: Vec<String>,
    pub jwt: JwtConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            database: None,
            posts_per_page: DEFAULT_PAGE_SIZE,
            admin_usernames: Vec::new(),
            jwt: JwtConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut db = DatabaseConfig::new(url);
            db.max_connections = env_or("DB_MAX_CONNECTIONS", db.max_connections);
            db.min_connections = env_or("DB_MIN_CONNECTIONS", db.min_connections);
            db.sqlx_logging = env_or("DB_SQLX_LOGGING", false);
            db
        });

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env_or("PORT", defaults.port),
            database,
            posts_per_page: env_or("POSTS_PER_PAGE", defaults.posts_per_page).max(1),
            admin_usernames: env::var("ADMIN_USERNAMES")
                .map(|raw| parse_list(&raw))
                .unwrap_or_default(),
            jwt: JwtConfig::from_env(),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

/// Split a comma separated list, dropping blanks.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list("leo, auth,,  "), vec!["leo", "auth"]);
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.posts_per_page, 10);
        assert!(config.database.is_none());
    }
}
