//! In-memory entity store - used when no database is configured and in tests.

mod store;

pub use store::{InMemoryGroupRepository, InMemoryPostRepository, InMemoryStore, InMemoryUserRepository};
