use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    ong_db::health_check(&pool).await.unwrap();

    let tables = [
        "admin_users",
        "contact_messages",
        "gallery_albums",
        "gallery_photos",
        "forms",
        "form_submissions",
        "payment_gates",
        "projects",
        "site_config",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// All `id` columns must be bigint.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_pks_are_bigint(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, data_type
         FROM information_schema.columns
         WHERE column_name = 'id'
           AND table_schema = 'public'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!rows.is_empty());
    for (table, data_type) in &rows {
        assert_eq!(data_type, "bigint", "Table {table}.id should be bigint");
    }
}

/// Every table must carry an `updated_at` kept current by the shared trigger.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_tables_have_updated_at_trigger(pool: PgPool) {
    let tables: Vec<(String,)> = sqlx::query_as(
        "SELECT table_name
         FROM information_schema.tables
         WHERE table_schema = 'public'
           AND table_type = 'BASE TABLE'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    for (table,) in &tables {
        let trigger: Option<(String,)> = sqlx::query_as(
            "SELECT trigger_name FROM information_schema.triggers
             WHERE event_object_table = $1 AND trigger_name = 'set_updated_at'
             LIMIT 1",
        )
        .bind(table)
        .fetch_optional(&pool)
        .await
        .unwrap();
        assert!(trigger.is_some(), "{table} is missing the set_updated_at trigger");
    }
}
