//! Revision snapshot rows.

use std::collections::BTreeMap;

use fieldhist_core::field::FieldValue;
use fieldhist_core::revision::{Author, Revision, Translation};
use fieldhist_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `record_revisions` table.
#[derive(Debug, Clone, FromRow)]
pub struct RecordRevisionRow {
    pub record_id: DbId,
    pub revision_id: DbId,
    pub record_type: String,
    pub bundle: String,
    pub langcode: String,
    pub revision_timestamp: Timestamp,
    pub author_id: Option<DbId>,
    pub author_name: Option<String>,
    pub log_message: Option<String>,
    pub is_current: bool,
    pub fields: Json<BTreeMap<String, FieldValue>>,
    pub translations: Json<BTreeMap<String, Translation>>,
}

impl From<RecordRevisionRow> for Revision {
    fn from(row: RecordRevisionRow) -> Self {
        // A revision whose author account is gone keeps its id but loses
        // the name; both are needed to show an author.
        let author = match (row.author_id, row.author_name) {
            (Some(id), Some(display_name)) => Some(Author { id, display_name }),
            _ => None,
        };
        Revision {
            revision_id: row.revision_id,
            record_id: row.record_id,
            record_type: row.record_type,
            bundle: row.bundle,
            langcode: row.langcode,
            timestamp: row.revision_timestamp,
            author,
            log_message: row.log_message,
            is_current: row.is_current,
            fields: row.fields.0,
            translations: row.translations.0,
        }
    }
}
