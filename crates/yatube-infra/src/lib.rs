//! # Yatube Infrastructure
//!
//! Concrete implementations of the ports defined in `yatube-core`:
//! entity stores and authentication services.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory store only
//! - `postgres` - PostgreSQL entity store via SeaORM
//! - `auth` - JWT session tokens + Argon2 password hashing

pub mod database;
pub mod memory;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use database::DatabaseConnections;
pub use memory::InMemoryStore;

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

#[cfg(feature = "postgres")]
pub use database::PostgresStore;
