//! Repository for the `site_config` table.

use ong_core::site_config::{GateKey, GateSettings};
use sqlx::PgPool;

use crate::models::site_config::SiteConfigRow;

const COLUMNS: &str = "key, enabled, closed_title, closed_msg, updated_at";

/// Provides the two config gate rows.
pub struct SiteConfigRepo;

impl SiteConfigRepo {
    /// Load a gate row. `None` means it was never written.
    pub async fn find(pool: &PgPool, key: GateKey) -> Result<Option<SiteConfigRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM site_config WHERE key = $1");
        sqlx::query_as::<_, SiteConfigRow>(&query)
            .bind(key.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Effective settings for a gate, falling back to defaults when missing.
    pub async fn settings(pool: &PgPool, key: GateKey) -> Result<GateSettings, sqlx::Error> {
        Ok(Self::find(pool, key)
            .await?
            .map(|row| row.settings(key))
            .unwrap_or_else(|| GateSettings::defaults(key)))
    }

    /// Insert or replace a gate row.
    pub async fn upsert(
        pool: &PgPool,
        key: GateKey,
        settings: &GateSettings,
    ) -> Result<SiteConfigRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO site_config (key, enabled, closed_title, closed_msg)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (key) DO UPDATE SET
                enabled = EXCLUDED.enabled,
                closed_title = EXCLUDED.closed_title,
                closed_msg = EXCLUDED.closed_msg
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SiteConfigRow>(&query)
            .bind(key.as_str())
            .bind(settings.enabled)
            .bind(&settings.closed_title)
            .bind(&settings.closed_msg)
            .fetch_one(pool)
            .await
    }
}
