//! Site config gate model.

use ong_core::site_config::{GateKey, GateSettings};
use ong_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `site_config` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SiteConfigRow {
    pub key: String,
    pub enabled: bool,
    pub closed_title: String,
    pub closed_msg: String,
    pub updated_at: Timestamp,
}

impl SiteConfigRow {
    /// Effective settings, re-applying defaults to blank stored texts.
    pub fn settings(&self, key: GateKey) -> GateSettings {
        GateSettings::normalize(key, self.enabled, &self.closed_title, &self.closed_msg)
    }
}
