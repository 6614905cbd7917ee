//! # Blogly Infrastructure
//!
//! Concrete implementations of the repository ports defined in `blogly-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL storage via SeaORM
//! - `minimal` - No external dependencies, in-memory only

pub mod database;
pub mod memory;

pub use database::DatabaseConfig;
pub use memory::{InMemoryPostRepository, InMemoryStore, InMemoryTagRepository, InMemoryUserRepository};

#[cfg(feature = "postgres")]
pub use database::{DbPool, PostgresPostRepository, PostgresTagRepository, PostgresUserRepository};
