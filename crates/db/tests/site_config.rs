//! Integration tests for the config gate rows.

use ong_core::site_config::{GateKey, GateSettings};
use ong_db::repositories::SiteConfigRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Test: config gates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_config_uses_defaults(pool: PgPool) {
    let settings = SiteConfigRepo::settings(&pool, GateKey::Contacto).await.unwrap();
    assert_eq!(settings, GateSettings::defaults(GateKey::Contacto));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_config_upsert_overwrites(pool: PgPool) {
    let closed = GateSettings::normalize(GateKey::Inscripciones, false, "Cerrado", "");
    SiteConfigRepo::upsert(&pool, GateKey::Inscripciones, &closed).await.unwrap();
    let reopened = GateSettings::normalize(GateKey::Inscripciones, true, "", "");
    SiteConfigRepo::upsert(&pool, GateKey::Inscripciones, &reopened).await.unwrap();

    let settings = SiteConfigRepo::settings(&pool, GateKey::Inscripciones).await.unwrap();
    assert!(settings.enabled);
    assert_eq!(settings.closed_title, GateKey::Inscripciones.default_title());
}
