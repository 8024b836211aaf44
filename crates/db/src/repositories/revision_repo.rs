//! Repository for the `record_revisions` table.

use fieldhist_core::revision::Revision;
use fieldhist_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::revision::RecordRevisionRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "record_id, revision_id, record_type, bundle, langcode, \
    revision_timestamp, author_id, author_name, log_message, is_current, fields, translations";

/// Stores and reads revision snapshots.
pub struct RevisionRepo;

impl RevisionRepo {
    /// Revision ids of a record, oldest first.
    pub async fn list_ids(pool: &PgPool, record_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT revision_id FROM record_revisions \
             WHERE record_id = $1 ORDER BY revision_id ASC",
        )
        .bind(record_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    pub async fn find(
        pool: &PgPool,
        record_id: DbId,
        revision_id: DbId,
    ) -> Result<Option<RecordRevisionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM record_revisions WHERE record_id = $1 AND revision_id = $2"
        );
        sqlx::query_as::<_, RecordRevisionRow>(&query)
            .bind(record_id)
            .bind(revision_id)
            .fetch_optional(pool)
            .await
    }

    /// The record's current revision, if one is marked.
    pub async fn find_current(
        pool: &PgPool,
        record_id: DbId,
    ) -> Result<Option<RecordRevisionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM record_revisions WHERE record_id = $1 AND is_current = true"
        );
        sqlx::query_as::<_, RecordRevisionRow>(&query)
            .bind(record_id)
            .fetch_optional(pool)
            .await
    }

    /// Store a snapshot.
    ///
    /// A snapshot marked current takes the marker from whichever revision
    /// of the record held it before.
    pub async fn insert(pool: &PgPool, revision: &Revision) -> Result<RecordRevisionRow, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if revision.is_current {
            sqlx::query(
                "UPDATE record_revisions SET is_current = false \
                 WHERE record_id = $1 AND is_current = true",
            )
            .bind(revision.record_id)
            .execute(&mut *tx)
            .await?;
        }

        let (author_id, author_name) = match &revision.author {
            Some(author) => (Some(author.id), Some(author.display_name.as_str())),
            None => (None, None),
        };
        let query = format!(
            "INSERT INTO record_revisions
                (record_id, revision_id, record_type, bundle, langcode, revision_timestamp,
                 author_id, author_name, log_message, is_current, fields, translations)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, RecordRevisionRow>(&query)
            .bind(revision.record_id)
            .bind(revision.revision_id)
            .bind(&revision.record_type)
            .bind(&revision.bundle)
            .bind(&revision.langcode)
            .bind(revision.timestamp)
            .bind(author_id)
            .bind(author_name)
            .bind(&revision.log_message)
            .bind(revision.is_current)
            .bind(Json(&revision.fields))
            .bind(Json(&revision.translations))
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row)
    }

    /// Move the current marker to `revision_id`.
    ///
    /// Returns `false`, leaving the marker where it was, if the revision
    /// does not exist.
    pub async fn set_current(
        pool: &PgPool,
        record_id: DbId,
        revision_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let exists: Option<(DbId,)> = sqlx::query_as(
            "SELECT revision_id FROM record_revisions WHERE record_id = $1 AND revision_id = $2",
        )
        .bind(record_id)
        .bind(revision_id)
        .fetch_optional(&mut *tx)
        .await?;
        if exists.is_none() {
            return Ok(false);
        }

        sqlx::query(
            "UPDATE record_revisions SET is_current = false \
             WHERE record_id = $1 AND is_current = true",
        )
        .bind(record_id)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "UPDATE record_revisions SET is_current = true \
             WHERE record_id = $1 AND revision_id = $2",
        )
        .bind(record_id)
        .bind(revision_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Delete one revision. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, record_id: DbId, revision_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM record_revisions WHERE record_id = $1 AND revision_id = $2")
            .bind(record_id)
            .bind(revision_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
