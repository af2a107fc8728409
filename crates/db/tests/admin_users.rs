//! Integration tests for admin account bookkeeping.

use ong_db::models::admin_user::CreateAdminUser;
use ong_db::repositories::AdminUserRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Test: admin login bookkeeping
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_email_is_case_insensitive_and_unique(pool: PgPool) {
    let admin = AdminUserRepo::create(
        &pool,
        &CreateAdminUser {
            email: "Admin@Example.org".into(),
            password_hash: "hash".into(),
        },
    )
    .await
    .unwrap();
    assert_eq!(admin.email, "admin@example.org");

    let found = AdminUserRepo::find_by_email(&pool, "ADMIN@example.org").await.unwrap();
    assert_eq!(found.map(|a| a.id), Some(admin.id));

    let dup = AdminUserRepo::create(
        &pool,
        &CreateAdminUser {
            email: "admin@example.org".into(),
            password_hash: "hash".into(),
        },
    )
    .await;
    assert!(dup.is_err());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_logins_count_up_and_reset(pool: PgPool) {
    let admin = AdminUserRepo::create(
        &pool,
        &CreateAdminUser {
            email: "a@example.org".into(),
            password_hash: "hash".into(),
        },
    )
    .await
    .unwrap();

    assert_eq!(AdminUserRepo::increment_failed_login(&pool, admin.id).await.unwrap(), 1);
    assert_eq!(AdminUserRepo::increment_failed_login(&pool, admin.id).await.unwrap(), 2);

    AdminUserRepo::record_successful_login(&pool, admin.id).await.unwrap();
    let admin = AdminUserRepo::find_by_id(&pool, admin.id).await.unwrap().unwrap();
    assert_eq!(admin.failed_login_count, 0);
    assert!(admin.last_login_at.is_some());
}
