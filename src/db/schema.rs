//! Forum table bootstrap
//!
//! Creates the six forum tables when they are missing so a fresh database can
//! serve status requests. Statements are idempotent (`IF NOT EXISTS`) and no
//! migration history is kept; an existing schema is left untouched.
//!
//! # Usage
//!
//! ```ignore
//! use forum_service::db::{create_pool, schema};
//!
//! let pool = create_pool(&config).await?;
//! schema::ensure_schema(&pool).await?;
//! ```

use anyhow::{Context, Result};

use super::DynDatabasePool;
use crate::config::DatabaseDriver;
use crate::models::ForumTable;

/// Create any forum table that does not exist yet.
///
/// Returns the number of statements executed.
pub async fn ensure_schema(pool: &DynDatabasePool) -> Result<usize> {
    let statements = schema_statements(pool.driver(), pool.schema());

    for statement in &statements {
        pool.execute(statement)
            .await
            .with_context(|| format!("Failed to execute: {}", truncate_sql(statement)))?;
    }

    tracing::debug!(
        "Forum schema ensured ({} statements, {:?})",
        statements.len(),
        pool.driver()
    );
    Ok(statements.len())
}

/// DDL for the forum tables, in dependency order
pub fn schema_statements(driver: DatabaseDriver, schema: Option<&str>) -> Vec<String> {
    let t = |table: ForumTable| table.quoted(driver, schema);
    let (text, key, serial) = match driver {
        DatabaseDriver::Sqlite => ("TEXT", "TEXT", "INTEGER PRIMARY KEY AUTOINCREMENT"),
        DatabaseDriver::Mysql => ("TEXT", "VARCHAR(128)", "BIGINT PRIMARY KEY AUTO_INCREMENT"),
        DatabaseDriver::Postgres => ("TEXT", "CITEXT", "BIGSERIAL PRIMARY KEY"),
    };
    // MySQL needs the same fractional precision on the column and its default
    let (timestamp, now) = match driver {
        DatabaseDriver::Sqlite => ("TIMESTAMP", "CURRENT_TIMESTAMP"),
        DatabaseDriver::Mysql => ("TIMESTAMP(3)", "CURRENT_TIMESTAMP(3)"),
        DatabaseDriver::Postgres => ("TIMESTAMPTZ", "CURRENT_TIMESTAMP"),
    };
    let id_ref = match driver {
        DatabaseDriver::Sqlite => "INTEGER",
        DatabaseDriver::Mysql | DatabaseDriver::Postgres => "BIGINT",
    };

    let mut statements = Vec::new();

    if driver == DatabaseDriver::Postgres {
        statements.push("CREATE EXTENSION IF NOT EXISTS citext".to_string());
        if let Some(schema) = schema {
            statements.push(format!("CREATE SCHEMA IF NOT EXISTS \"{}\"", schema));
        }
    }

    statements.push(format!(
        "CREATE TABLE IF NOT EXISTS {user} (
            nickname {key} PRIMARY KEY,
            fullname {text} NOT NULL,
            about {text},
            email {key} NOT NULL UNIQUE
        )",
        user = t(ForumTable::User),
    ));

    statements.push(format!(
        "CREATE TABLE IF NOT EXISTS {forum} (
            slug {key} PRIMARY KEY,
            title {text} NOT NULL,
            author {key} NOT NULL,
            posts BIGINT NOT NULL DEFAULT 0,
            threads BIGINT NOT NULL DEFAULT 0,
            FOREIGN KEY (author) REFERENCES {user} (nickname)
        )",
        forum = t(ForumTable::Forum),
        user = t(ForumTable::User),
    ));

    statements.push(format!(
        "CREATE TABLE IF NOT EXISTS {thread} (
            id {serial},
            slug {key} UNIQUE,
            title {text} NOT NULL,
            author {key} NOT NULL,
            forum {key} NOT NULL,
            message {text} NOT NULL,
            votes INTEGER NOT NULL DEFAULT 0,
            created {timestamp} NOT NULL DEFAULT {now},
            FOREIGN KEY (author) REFERENCES {user} (nickname),
            FOREIGN KEY (forum) REFERENCES {forum} (slug)
        )",
        thread = t(ForumTable::Thread),
        user = t(ForumTable::User),
        forum = t(ForumTable::Forum),
    ));

    statements.push(format!(
        "CREATE TABLE IF NOT EXISTS {post} (
            id {serial},
            parent {id_ref} NOT NULL DEFAULT 0,
            author {key} NOT NULL,
            message {text} NOT NULL,
            is_edited BOOLEAN NOT NULL DEFAULT FALSE,
            forum {key} NOT NULL,
            thread {id_ref} NOT NULL,
            created {timestamp} NOT NULL DEFAULT {now},
            FOREIGN KEY (author) REFERENCES {user} (nickname),
            FOREIGN KEY (forum) REFERENCES {forum} (slug),
            FOREIGN KEY (thread) REFERENCES {thread} (id)
        )",
        post = t(ForumTable::Post),
        user = t(ForumTable::User),
        forum = t(ForumTable::Forum),
        thread = t(ForumTable::Thread),
    ));

    statements.push(format!(
        "CREATE TABLE IF NOT EXISTS {vote} (
            nickname {key} NOT NULL,
            thread {id_ref} NOT NULL,
            voice SMALLINT NOT NULL,
            PRIMARY KEY (nickname, thread),
            FOREIGN KEY (nickname) REFERENCES {user} (nickname),
            FOREIGN KEY (thread) REFERENCES {thread} (id)
        )",
        vote = t(ForumTable::Vote),
        user = t(ForumTable::User),
        thread = t(ForumTable::Thread),
    ));

    statements.push(format!(
        "CREATE TABLE IF NOT EXISTS {ubf} (
            forum {key} NOT NULL,
            nickname {key} NOT NULL,
            PRIMARY KEY (forum, nickname),
            FOREIGN KEY (forum) REFERENCES {forum} (slug),
            FOREIGN KEY (nickname) REFERENCES {user} (nickname)
        )",
        ubf = t(ForumTable::UsersByForum),
        forum = t(ForumTable::Forum),
        user = t(ForumTable::User),
    ));

    statements
}

/// Truncate SQL for error messages
fn truncate_sql(sql: &str) -> String {
    let sql = sql.trim();
    match sql.char_indices().nth(100) {
        Some((idx, _)) => format!("{}...", &sql[..idx]),
        None => sql.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;
    use sqlx::Row;

    async fn table_names(pool: &DynDatabasePool) -> Vec<String> {
        let rows = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .fetch_all(pool.as_sqlite().expect("SQLite pool"))
            .await
            .expect("Failed to list tables");
        rows.iter().map(|r| r.get::<String, _>("name")).collect()
    }

    #[tokio::test]
    async fn test_ensure_schema_creates_forum_tables() {
        let pool = create_test_pool().await.expect("Failed to create test pool");

        let executed = ensure_schema(&pool).await.expect("Failed to ensure schema");
        assert_eq!(executed, 6);

        let names = table_names(&pool).await;
        for table in ForumTable::CLEAR_ORDER {
            assert!(
                names.iter().any(|n| n == table.table_name()),
                "missing table {}",
                table
            );
        }
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let pool = create_test_pool().await.expect("Failed to create test pool");

        ensure_schema(&pool).await.expect("First run failed");
        pool.execute("INSERT INTO \"User\" (nickname, fullname, email) VALUES ('alice', 'Alice', 'a@example.com')")
            .await
            .expect("Failed to insert user");

        ensure_schema(&pool).await.expect("Second run failed");

        let row = sqlx::query("SELECT COUNT(*) AS count FROM \"User\"")
            .fetch_one(pool.as_sqlite().expect("SQLite pool"))
            .await
            .expect("Failed to count");
        assert_eq!(row.get::<i64, _>("count"), 1);
    }

    #[test]
    fn test_postgres_statements_are_schema_qualified() {
        let statements = schema_statements(DatabaseDriver::Postgres, Some("dbproject"));
        assert!(statements
            .iter()
            .any(|s| s == "CREATE SCHEMA IF NOT EXISTS \"dbproject\""));
        assert!(statements
            .iter()
            .any(|s| s.contains("CREATE TABLE IF NOT EXISTS \"dbproject\".\"Users_by_Forum\"")));
    }

    #[test]
    fn test_mysql_statements_use_backticks() {
        let statements = schema_statements(DatabaseDriver::Mysql, None);
        assert_eq!(statements.len(), 6);
        assert!(statements[0].contains("`User`"));
        assert!(statements.iter().all(|s| !s.contains('"')));
    }

    #[test]
    fn test_mysql_timestamp_default_matches_precision() {
        let statements = schema_statements(DatabaseDriver::Mysql, None);
        let created: Vec<&str> = statements
            .iter()
            .flat_map(|s| s.lines())
            .filter(|l| l.trim_start().starts_with("created "))
            .collect();

        assert_eq!(created.len(), 2);
        for line in created {
            assert!(
                line.contains("TIMESTAMP(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3)"),
                "mismatched precision: {}",
                line
            );
        }
    }

    #[test]
    fn test_sqlite_timestamp_default() {
        let statements = schema_statements(DatabaseDriver::Sqlite, None);
        assert!(statements
            .iter()
            .any(|s| s.contains("created TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,")));
    }

    #[test]
    fn test_truncate_sql() {
        let long = "x".repeat(150);
        assert_eq!(truncate_sql(&long).len(), 103);
        assert_eq!(truncate_sql("SELECT 1"), "SELECT 1");
    }
}
