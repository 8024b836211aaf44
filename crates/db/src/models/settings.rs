//! Stored history settings documents.

use fieldhist_core::eligibility::HistorySettings;
use fieldhist_core::types::Timestamp;
use sqlx::types::Json;
use sqlx::FromRow;

/// Name of the settings document the service reads by default.
pub const DEFAULT_SETTINGS_NAME: &str = "default";

/// A row from the `field_history_settings` table.
#[derive(Debug, Clone, FromRow)]
pub struct HistorySettingsRow {
    pub name: String,
    pub settings: Json<HistorySettings>,
    pub updated_at: Timestamp,
}
