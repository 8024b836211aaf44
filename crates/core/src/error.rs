use crate::types::DbId;

/// Failures reported by the timeline builder and the restore engine.
///
/// None of these are fatal. The caller decides whether to surface them
/// (revision gone, load failure) or swallow them (invalid request).
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Incomplete or inconsistent request, or tracking disabled for the field.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Revision {revision_id} of record {record_id} not found")]
    RevisionNotFound { record_id: DbId, revision_id: DbId },

    /// The revision store failed while loading.
    #[error("Failed to load revisions: {0}")]
    LoadFailure(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
