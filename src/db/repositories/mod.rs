//! Database repositories
//!
//! Repository pattern implementations for database access.

pub mod status;

pub use status::{SqlxStatusRepository, StatusRepository};
