use std::time::Duration;

#[cfg(feature = "postgres")]
use sea_orm::{ConnectOptions, Database, DbConn, DbErr};

/// Configuration for the blog database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Log every SQL statement at debug level.
    pub sqlx_logging: bool,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 20,
            min_connections: 2,
            sqlx_logging: false,
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(10)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(300)
    }
}

/// Connection pool to the blog database.
///
/// # Example
/// ```ignore
/// let db = DatabaseConnections::init(&config).await?;
/// let store = PostgresStore::new(db.main.clone());
/// ```
#[cfg(feature = "postgres")]
pub struct DatabaseConnections {
    pub main: DbConn,
}

#[cfg(not(feature = "postgres"))]
pub struct DatabaseConnections;

#[cfg(feature = "postgres")]
impl DatabaseConnections {
    /// Open the pool described by the configuration.
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Initializing database connection...");

        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(config.connect_timeout())
            .idle_timeout(config.idle_timeout())
            .sqlx_logging(config.sqlx_logging)
            .to_owned();

        let main = Database::connect(opts).await?;
        tracing::info!("Database connected (pool: {})", config.max_connections);

        Ok(Self { main })
    }

    /// Round-trip to the server; used by the health check.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.main.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = DatabaseConfig::new("postgres://localhost/yatube");
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.min_connections, 2);
        assert!(!config.sqlx_logging);
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
    }
}
