//! Data models
//!
//! This module contains the data structures used throughout the forum service.
//! Models represent:
//! - The forum tables the service operates on (ForumTable)
//! - Status snapshots returned to callers (Status, StatusReport)

mod status;

pub use status::{CountFailure, ForumTable, Status, StatusReport};
