//! Application state - shared across all handlers.

use std::sync::Arc;

use yatube_core::ports::{GroupRepository, PasswordService, PostRepository, UserRepository};
use yatube_core::{Accounts, Blog};
use yatube_infra::{Argon2PasswordService, DatabaseConnections, InMemoryStore};

#[cfg(feature = "postgres")]
use yatube_infra::PostgresStore;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: Blog,
    pub accounts: Accounts,
    pub groups: Arc<dyn GroupRepository>,
    pub db: Option<Arc<DatabaseConnections>>,
    pub posts_per_page: u64,
    pub admin_usernames: Arc<Vec<String>>,
}

impl AppState {
    /// Build the application state, connecting to the database when configured.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        {
            if let Some(db_config) = &config.database {
                match DatabaseConnections::init(db_config).await {
                    Ok(connections) => {
                        let conn = Arc::new(connections);
                        let store = PostgresStore::new(conn.main.clone());
                        tracing::info!("Application state initialized (postgres)");
                        return Self::assemble(
                            config,
                            Arc::new(store.users()),
                            Arc::new(store.groups()),
                            Arc::new(store.posts()),
                            Some(conn),
                        );
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            }
        }

        #[cfg(not(feature = "postgres"))]
        tracing::info!("Running without postgres feature - using in-memory store");

        Self::in_memory(config, &InMemoryStore::new())
    }

    /// State backed by an in-memory store. Data is lost on restart.
    pub fn in_memory(config: &AppConfig, store: &InMemoryStore) -> Self {
        Self::assemble(
            config,
            Arc::new(store.users()),
            Arc::new(store.groups()),
            Arc::new(store.posts()),
            None,
        )
    }

    fn assemble(
        config: &AppConfig,
        users: Arc<dyn UserRepository>,
        groups: Arc<dyn GroupRepository>,
        posts: Arc<dyn PostRepository>,
        db: Option<Arc<DatabaseConnections>>,
    ) -> Self {
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        Self {
            blog: Blog::new(users.clone(), groups.clone(), posts),
            accounts: Accounts::new(users, passwords),
            groups,
            db,
            posts_per_page: config.posts_per_page,
            admin_usernames: Arc::new(config.admin_usernames.clone()),
        }
    }

    /// Roles carried in the session token of `username`.
    pub fn roles_for(&self, username: &str) -> Vec<String> {
        let mut roles = vec!["user".to_string()];
        if self.admin_usernames.iter().any(|u| u == username) {
            roles.push("admin".to_string());
        }
        roles
    }
}
