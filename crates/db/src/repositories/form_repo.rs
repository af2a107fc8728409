//! Repository for the `forms` table.

use ong_core::fields::Field;
use ong_core::pagination::PageCursor;
use ong_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::form::{CreateForm, Form, UpdateForm};

const COLUMNS: &str =
    "id, title, description, is_active, fields, payment_plans, created_at, updated_at";

/// Provides CRUD operations and activation for registration forms.
pub struct FormRepo;

impl FormRepo {
    /// Insert a new, inactive form.
    pub async fn create(pool: &PgPool, input: &CreateForm) -> Result<Form, sqlx::Error> {
        let query = format!(
            "INSERT INTO forms (title, description, fields, payment_plans)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Form>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(Json(&input.fields))
            .bind(Json(&input.payment_plans))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Form>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM forms WHERE id = $1");
        sqlx::query_as::<_, Form>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of forms for the admin console, most recently updated first.
    pub async fn list(
        pool: &PgPool,
        cursor: Option<PageCursor>,
        limit: i64,
    ) -> Result<Vec<Form>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM forms
             WHERE ($1::TIMESTAMPTZ IS NULL OR (updated_at, id) < ($1, $2))
             ORDER BY updated_at DESC, id DESC
             LIMIT $3"
        );
        sqlx::query_as::<_, Form>(&query)
            .bind(cursor.map(|c| c.at))
            .bind(cursor.map(|c| c.id))
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Active forms, most recently updated first.
    pub async fn list_active(pool: &PgPool, limit: i64) -> Result<Vec<Form>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM forms WHERE is_active
             ORDER BY updated_at DESC, id DESC
             LIMIT $1"
        );
        sqlx::query_as::<_, Form>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Most recently updated forms regardless of state.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<Form>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM forms
             ORDER BY updated_at DESC, id DESC
             LIMIT $1"
        );
        sqlx::query_as::<_, Form>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Update form metadata. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateForm,
    ) -> Result<Option<Form>, sqlx::Error> {
        let query = format!(
            "UPDATE forms SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                payment_plans = COALESCE($4, payment_plans)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Form>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.payment_plans.as_ref().map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Replace the whole field array. Last writer wins.
    pub async fn replace_fields(
        pool: &PgPool,
        id: DbId,
        fields: &[Field],
    ) -> Result<Option<Form>, sqlx::Error> {
        let query = format!("UPDATE forms SET fields = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Form>(&query)
            .bind(id)
            .bind(Json(fields))
            .fetch_optional(pool)
            .await
    }

    /// Make `id` the only active form.
    ///
    /// Deactivates every other form and activates the target in one
    /// transaction. Returns `None` (and changes nothing) if the form does
    /// not exist. `uq_forms_single_active` backs this up at the schema level.
    pub async fn activate(pool: &PgPool, id: DbId) -> Result<Option<Form>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("UPDATE forms SET is_active = false WHERE is_active AND id <> $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let query = format!("UPDATE forms SET is_active = true WHERE id = $1 RETURNING {COLUMNS}");
        let activated = sqlx::query_as::<_, Form>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        if activated.is_some() {
            tx.commit().await?;
        }
        Ok(activated)
    }

    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<Option<Form>, sqlx::Error> {
        let query = format!("UPDATE forms SET is_active = false WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Form>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn count_active(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM forms WHERE is_active")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Permanently delete a form. Its submissions are kept.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM forms WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
