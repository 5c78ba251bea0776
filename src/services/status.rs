//! Status service
//!
//! Business logic behind the forum service endpoints. Wraps a
//! [`StatusRepository`] and offers two views of each operation:
//! - a typed one (`try_clear_all`, `try_get_status`) that lets callers tell an
//!   empty forum apart from an unreachable database
//! - an infallible one (`clear_all`, `get_status`) that logs the failure and
//!   degrades to `false` / zero counts

use std::sync::Arc;
use thiserror::Error;

use crate::db::repositories::StatusRepository;
use crate::models::{CountFailure, ForumTable, Status, StatusReport};

/// Status service errors
#[derive(Debug, Error)]
pub enum StatusServiceError {
    #[error("Failed to clear forum tables: {0}")]
    ClearFailed(String),

    #[error("Status is incomplete, failed to count: {}", format_tables(.failures))]
    Incomplete {
        /// Counts that did succeed; failed tables are zero
        status: Status,
        failures: Vec<CountFailure>,
    },
}

impl StatusServiceError {
    /// Tables whose count failed, empty for clear failures
    pub fn failed_tables(&self) -> Vec<ForumTable> {
        match self {
            Self::ClearFailed(_) => Vec::new(),
            Self::Incomplete { failures, .. } => failures.iter().map(|f| f.table).collect(),
        }
    }
}

fn format_tables(failures: &[CountFailure]) -> String {
    failures
        .iter()
        .map(|f| f.table.table_name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Service for the status and clear operations
pub struct StatusService {
    repo: Arc<dyn StatusRepository>,
}

impl StatusService {
    /// Create a new status service
    pub fn new(repo: Arc<dyn StatusRepository>) -> Self {
        Self { repo }
    }

    /// Remove every row from all forum tables.
    ///
    /// Returns the number of rows removed where the database reports it.
    pub async fn try_clear_all(&self) -> Result<u64, StatusServiceError> {
        self.repo
            .clear_all()
            .await
            .map_err(|e| StatusServiceError::ClearFailed(format!("{:#}", e)))
    }

    /// Remove every row from all forum tables, reporting only success.
    pub async fn clear_all(&self) -> bool {
        match self.try_clear_all().await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!("{}", e);
                false
            }
        }
    }

    /// Count posts, users, forums and threads, failing if any count failed.
    pub async fn try_get_status(&self) -> Result<Status, StatusServiceError> {
        self.repo
            .get_status()
            .await
            .into_result()
            .map_err(|report| StatusServiceError::Incomplete {
                status: report.status,
                failures: report.failures,
            })
    }

    /// Count posts, users, forums and threads.
    ///
    /// Never fails: counts whose query failed are zero. Use
    /// [`StatusService::try_get_status`] to detect that case.
    pub async fn get_status(&self) -> Status {
        self.report().await.status
    }

    /// Counts together with every individual failure
    pub async fn report(&self) -> StatusReport {
        let report = self.repo.get_status().await;
        if !report.is_complete() {
            tracing::warn!(
                "Status incomplete, {} of {} counts failed",
                report.failures.len(),
                ForumTable::COUNTED.len()
            );
        }
        report
    }
}
