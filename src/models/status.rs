//! Status snapshot model
//!
//! Row counts of the forum tables as reported by the service endpoints.

use serde::{Deserialize, Serialize};

use crate::config::DatabaseDriver;

/// Tables owned by the forum application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ForumTable {
    Thread,
    Forum,
    User,
    Vote,
    Post,
    #[serde(rename = "Users_by_Forum")]
    UsersByForum,
}

impl ForumTable {
    /// Every forum table, in the order they are removed by a delete-based clear.
    ///
    /// Rows that reference other tables come first so foreign keys never block a delete.
    pub const CLEAR_ORDER: [ForumTable; 6] = [
        ForumTable::Vote,
        ForumTable::Post,
        ForumTable::UsersByForum,
        ForumTable::Thread,
        ForumTable::Forum,
        ForumTable::User,
    ];

    /// Tables counted by a status snapshot, in query order
    pub const COUNTED: [ForumTable; 4] = [
        ForumTable::Post,
        ForumTable::User,
        ForumTable::Forum,
        ForumTable::Thread,
    ];

    /// Table name as it exists in the database
    pub fn table_name(&self) -> &'static str {
        match self {
            Self::Thread => "Thread",
            Self::Forum => "Forum",
            Self::User => "User",
            Self::Vote => "Vote",
            Self::Post => "Post",
            Self::UsersByForum => "Users_by_Forum",
        }
    }

    /// Quoted (and optionally schema-qualified) identifier for the given driver
    ///
    /// `User` is a reserved word in every supported database, so names are always quoted.
    pub fn quoted(&self, driver: DatabaseDriver, schema: Option<&str>) -> String {
        match driver {
            DatabaseDriver::Mysql => format!("`{}`", self.table_name()),
            DatabaseDriver::Sqlite => format!("\"{}\"", self.table_name()),
            DatabaseDriver::Postgres => match schema {
                Some(schema) => format!("\"{}\".\"{}\"", schema, self.table_name()),
                None => format!("\"{}\"", self.table_name()),
            },
        }
    }
}

impl std::fmt::Display for ForumTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table_name())
    }
}

/// Row counts of the four counted forum tables
///
/// Built fresh for every request. The counts come from independent queries, so
/// under concurrent writes they may reflect slightly different points in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub forum: i64,
    pub post: i64,
    pub thread: i64,
    pub user: i64,
}

impl Status {
    pub(crate) fn set(&mut self, table: ForumTable, count: i64) {
        match table {
            ForumTable::Post => self.post = count,
            ForumTable::User => self.user = count,
            ForumTable::Forum => self.forum = count,
            ForumTable::Thread => self.thread = count,
            ForumTable::Vote | ForumTable::UsersByForum => {}
        }
    }

    /// Sum of all four counts
    pub fn total(&self) -> i64 {
        self.post + self.user + self.forum + self.thread
    }
}

/// A count query that did not produce a value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountFailure {
    pub table: ForumTable,
    pub message: String,
}

/// Result of a status request that tolerates individual query failures
///
/// Tables listed in `failures` have a zero count in `status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub status: Status,
    pub failures: Vec<CountFailure>,
}

impl StatusReport {
    /// Whether every count query succeeded
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed_tables(&self) -> Vec<ForumTable> {
        self.failures.iter().map(|f| f.table).collect()
    }

    /// The status if every count succeeded, otherwise the report itself
    pub fn into_result(self) -> Result<Status, StatusReport> {
        if self.is_complete() {
            Ok(self.status)
        } else {
            Err(self)
        }
    }
}
