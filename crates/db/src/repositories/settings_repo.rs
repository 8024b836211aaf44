//! Repository for the `field_history_settings` table.

use fieldhist_core::eligibility::HistorySettings;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::settings::HistorySettingsRow;

const COLUMNS: &str = "name, settings, updated_at";

/// Loads and saves named history settings documents.
pub struct SettingsRepo;

impl SettingsRepo {
    pub async fn find(pool: &PgPool, name: &str) -> Result<Option<HistorySettingsRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM field_history_settings WHERE name = $1");
        sqlx::query_as::<_, HistorySettingsRow>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// The named settings, or defaults (everything disabled) if none are stored.
    pub async fn load(pool: &PgPool, name: &str) -> Result<HistorySettings, sqlx::Error> {
        Ok(Self::find(pool, name)
            .await?
            .map(|row| row.settings.0)
            .unwrap_or_default())
    }

    /// Insert or replace the named settings.
    pub async fn save(
        pool: &PgPool,
        name: &str,
        settings: &HistorySettings,
    ) -> Result<HistorySettingsRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO field_history_settings (name, settings)
             VALUES ($1, $2)
             ON CONFLICT (name) DO UPDATE SET settings = EXCLUDED.settings, updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HistorySettingsRow>(&query)
            .bind(name)
            .bind(Json(settings))
            .fetch_one(pool)
            .await
    }
}
