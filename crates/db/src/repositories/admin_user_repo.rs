//! Repository for the `admin_users` table.

use ong_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::admin_user::{AdminUser, CreateAdminUser};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, password_hash, is_active, failed_login_count, \
                       locked_until, last_login_at, created_at, updated_at";

/// Provides account and login bookkeeping for admins.
pub struct AdminUserRepo;

impl AdminUserRepo {
    /// Insert a new admin, returning the created row.
    ///
    /// Emails are stored lowercased; a duplicate violates `uq_admin_users_email`.
    pub async fn create(pool: &PgPool, input: &CreateAdminUser) -> Result<AdminUser, sqlx::Error> {
        let query = format!(
            "INSERT INTO admin_users (email, password_hash)
             VALUES (LOWER($1), $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdminUser>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AdminUser>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM admin_users WHERE id = $1");
        sqlx::query_as::<_, AdminUser>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an admin by email (case-insensitive).
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<AdminUser>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM admin_users WHERE email = LOWER($1)");
        sqlx::query_as::<_, AdminUser>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List all admins, oldest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<AdminUser>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM admin_users ORDER BY created_at, id");
        sqlx::query_as::<_, AdminUser>(&query).fetch_all(pool).await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM admin_users")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Increment `failed_login_count`, returning the new value.
    pub async fn increment_failed_login(pool: &PgPool, id: DbId) -> Result<i32, sqlx::Error> {
        let row: (i32,) = sqlx::query_as(
            "UPDATE admin_users SET failed_login_count = failed_login_count + 1
             WHERE id = $1
             RETURNING failed_login_count",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Lock an account until the given timestamp and restart the failure count.
    pub async fn lock_account(
        pool: &PgPool,
        id: DbId,
        until: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE admin_users SET locked_until = $2, failed_login_count = 0 WHERE id = $1")
            .bind(id)
            .bind(until)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Record a successful login: reset `failed_login_count` to 0, clear `locked_until`,
    /// and set `last_login_at` to now.
    pub async fn record_successful_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE admin_users SET
                failed_login_count = 0,
                locked_until = NULL,
                last_login_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
