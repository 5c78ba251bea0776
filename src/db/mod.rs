//! Database layer
//!
//! This module provides database abstraction for the forum service.
//! It supports:
//! - SQLite (default, for single-binary deployment)
//! - MySQL
//! - PostgreSQL (optionally with a schema qualifying the forum tables)
//!
//! The database driver is selected based on configuration.
//!
//! # Architecture
//!
//! The database layer uses a trait-based abstraction (`DatabasePool`) that
//! allows repositories to work with any backend without knowing which one is
//! configured. The pool is created once and injected into each repository.
//!
//! # Usage
//!
//! ```ignore
//! use forum_service::config::DatabaseConfig;
//! use forum_service::db::{create_pool, schema};
//!
//! let config = DatabaseConfig::default();
//! let pool = create_pool(&config).await?;
//!
//! schema::ensure_schema(&pool).await?;
//! pool.ping().await?;
//! ```

pub mod pool;
pub mod repositories;
pub mod schema;

pub use pool::{
    create_pool, create_test_pool, DatabasePool, DynDatabasePool, MysqlDatabase,
    PostgresDatabase, SqliteDatabase,
};
