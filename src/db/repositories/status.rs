//! Status repository
//!
//! Database operations behind the forum service endpoints:
//! - wiping every forum table in one atomic unit
//! - counting the rows of the posts, users, forums and threads tables
//!
//! This module provides:
//! - `StatusRepository` trait defining the interface
//! - `SqlxStatusRepository` implementing the trait for SQLite, MySQL and PostgreSQL

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{CountFailure, ForumTable, Status, StatusReport};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, PgPool, SqlitePool};
use std::sync::Arc;

/// Status repository trait
#[async_trait]
pub trait StatusRepository: Send + Sync {
    /// Remove every row from all forum tables.
    ///
    /// Either all six tables are emptied or none is. Returns the number of rows
    /// removed where the database reports it (`TRUNCATE` reports none).
    async fn clear_all(&self) -> Result<u64>;

    /// Count the rows of a single table
    async fn count(&self, table: ForumTable) -> Result<i64>;

    /// Count the posts, users, forums and threads tables.
    ///
    /// Every count is attempted even if an earlier one failed. Failed counts are
    /// logged, reported in `failures` and left at zero in `status`.
    async fn get_status(&self) -> StatusReport {
        let mut report = StatusReport::default();

        for table in ForumTable::COUNTED {
            match self.count(table).await {
                Ok(count) => report.status.set(table, count),
                Err(e) => {
                    tracing::error!(table = %table, "Failed to count rows: {:#}", e);
                    report.failures.push(CountFailure {
                        table,
                        message: format!("{:#}", e),
                    });
                }
            }
        }

        report
    }
}

/// SQLx-based status repository implementation
pub struct SqlxStatusRepository {
    pool: DynDatabasePool,
}

impl SqlxStatusRepository {
    /// Create a new SQLx status repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn StatusRepository> {
        Arc::new(Self::new(pool))
    }

    fn sqlite(&self) -> Result<&SqlitePool> {
        self.pool
            .as_sqlite()
            .context("Database pool does not expose a SQLite connection")
    }

    fn mysql(&self) -> Result<&MySqlPool> {
        self.pool
            .as_mysql()
            .context("Database pool does not expose a MySQL connection")
    }

    fn postgres(&self) -> Result<&PgPool> {
        self.pool
            .as_postgres()
            .context("Database pool does not expose a PostgreSQL connection")
    }
}

#[async_trait]
impl StatusRepository for SqlxStatusRepository {
    async fn clear_all(&self) -> Result<u64> {
        let removed = match self.pool.driver() {
            DatabaseDriver::Sqlite => clear_all_sqlite(self.sqlite()?).await,
            DatabaseDriver::Mysql => clear_all_mysql(self.mysql()?).await,
            DatabaseDriver::Postgres => {
                clear_all_postgres(self.postgres()?, self.pool.schema()).await
            }
        }?;

        tracing::info!("Cleared forum tables ({} rows removed)", removed);
        Ok(removed)
    }

    async fn count(&self, table: ForumTable) -> Result<i64> {
        let count = match self.pool.driver() {
            DatabaseDriver::Sqlite => count_sqlite(self.sqlite()?, table).await,
            DatabaseDriver::Mysql => count_mysql(self.mysql()?, table).await,
            DatabaseDriver::Postgres => {
                count_postgres(self.postgres()?, table, self.pool.schema()).await
            }
        }?;

        if count < 0 {
            anyhow::bail!("Negative row count {} reported for table {}", count, table);
        }
        tracing::debug!(table = %table, count, "Counted rows");
        Ok(count)
    }
}

fn count_sql(table: ForumTable, driver: DatabaseDriver, schema: Option<&str>) -> String {
    format!("SELECT COUNT(*) FROM {}", table.quoted(driver, schema))
}

/// Single statement emptying all forum tables (PostgreSQL only)
fn truncate_sql(schema: Option<&str>) -> String {
    let tables: Vec<String> = [
        ForumTable::Thread,
        ForumTable::Forum,
        ForumTable::User,
        ForumTable::Vote,
        ForumTable::Post,
        ForumTable::UsersByForum,
    ]
    .iter()
    .map(|t| t.quoted(DatabaseDriver::Postgres, schema))
    .collect();
    format!("TRUNCATE {}", tables.join(", "))
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn clear_all_sqlite(pool: &SqlitePool) -> Result<u64> {
    let mut tx = pool.begin().await.context("Failed to begin clear transaction")?;
    let mut removed = 0;

    for table in ForumTable::CLEAR_ORDER {
        let sql = format!("DELETE FROM {}", table.quoted(DatabaseDriver::Sqlite, None));
        let result = sqlx::query(&sql)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to clear table {}", table))?;
        removed += result.rows_affected();
    }

    tx.commit().await.context("Failed to commit clear transaction")?;
    Ok(removed)
}

async fn count_sqlite(pool: &SqlitePool, table: ForumTable) -> Result<i64> {
    let sql = count_sql(table, DatabaseDriver::Sqlite, None);
    let (count,): (i64,) = sqlx::query_as(&sql)
        .fetch_one(pool)
        .await
        .with_context(|| format!("Failed to count rows in {}", table))?;
    Ok(count)
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn clear_all_mysql(pool: &MySqlPool) -> Result<u64> {
    let mut tx = pool.begin().await.context("Failed to begin clear transaction")?;
    let mut removed = 0;

    for table in ForumTable::CLEAR_ORDER {
        let sql = format!("DELETE FROM {}", table.quoted(DatabaseDriver::Mysql, None));
        let result = sqlx::query(&sql)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to clear table {}", table))?;
        removed += result.rows_affected();
    }

    tx.commit().await.context("Failed to commit clear transaction")?;
    Ok(removed)
}

async fn count_mysql(pool: &MySqlPool, table: ForumTable) -> Result<i64> {
    let sql = count_sql(table, DatabaseDriver::Mysql, None);
    let (count,): (i64,) = sqlx::query_as(&sql)
        .fetch_one(pool)
        .await
        .with_context(|| format!("Failed to count rows in {}", table))?;
    Ok(count)
}

// ============================================================================
// PostgreSQL implementations
// ============================================================================

async fn clear_all_postgres(pool: &PgPool, schema: Option<&str>) -> Result<u64> {
    let result = sqlx::query(&truncate_sql(schema))
        .execute(pool)
        .await
        .context("Failed to truncate forum tables")?;
    Ok(result.rows_affected())
}

async fn count_postgres(pool: &PgPool, table: ForumTable, schema: Option<&str>) -> Result<i64> {
    let sql = count_sql(table, DatabaseDriver::Postgres, schema);
    let (count,): (i64,) = sqlx::query_as(&sql)
        .fetch_one(pool)
        .await
        .with_context(|| format!("Failed to count rows in {}", table))?;
    Ok(count)
}
