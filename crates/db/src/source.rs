//! [`RevisionSource`] backed by PostgreSQL.

use async_trait::async_trait;
use fieldhist_core::config::HistoryConfig;
use fieldhist_core::retry::RetryPolicy;
use fieldhist_core::revision::Revision;
use fieldhist_core::source::{RevisionSource, SourceError};
use fieldhist_core::types::DbId;

use crate::repositories::RevisionRepo;
use crate::DbPool;

/// Reads revision snapshots from the `record_revisions` table.
///
/// Reads that fail on a dropped connection or an exhausted pool are
/// retried under the configured [`RetryPolicy`]; every other error is
/// returned at once.
#[derive(Debug, Clone)]
pub struct PgRevisionSource {
    pool: DbPool,
    retry: RetryPolicy,
}

impl PgRevisionSource {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_config(mut self, config: &HistoryConfig) -> Self {
        self.retry = config.load_retry;
        self
    }
}

#[async_trait]
impl RevisionSource for PgRevisionSource {
    async fn list_revision_ids(&self, record_id: DbId) -> Result<Vec<DbId>, SourceError> {
        let ids = self
            .retry
            .run_if(|| RevisionRepo::list_ids(&self.pool, record_id), is_transient)
            .await
            .map_err(|e| backend_error(record_id, None, e))?;
        if ids.is_empty() {
            return Err(SourceError::NotFound {
                record_id,
                revision_id: None,
            });
        }
        Ok(ids)
    }

    async fn load_revision(&self, record_id: DbId, revision_id: DbId) -> Result<Revision, SourceError> {
        let found = self
            .retry
            .run_if(|| RevisionRepo::find(&self.pool, record_id, revision_id), is_transient)
            .await;
        match found {
            Ok(Some(row)) => Ok(row.into()),
            Ok(None) | Err(sqlx::Error::RowNotFound) => Err(SourceError::NotFound {
                record_id,
                revision_id: Some(revision_id),
            }),
            Err(e) => Err(backend_error(record_id, Some(revision_id), e)),
        }
    }
}

/// Errors worth another attempt: the query never reached a healthy connection.
fn is_transient(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut)
}

fn backend_error(record_id: DbId, revision_id: Option<DbId>, err: sqlx::Error) -> SourceError {
    tracing::warn!(record_id, revision_id, error = %err, "Revision query failed");
    SourceError::Backend(err.to_string())
}
