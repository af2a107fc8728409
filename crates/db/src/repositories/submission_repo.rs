//! Repository for the `form_submissions` table.

use ong_core::pagination::PageCursor;
use ong_core::payment::GateState;
use ong_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::submission::{CreateSubmission, FormSubmission, SubmissionFilter};

const COLUMNS: &str =
    "id, form_id, form_title, answers, status, payment, meta, created_at, updated_at";

/// Provides storage for registration submissions.
pub struct SubmissionRepo;

impl SubmissionRepo {
    /// Insert a submission, consuming the payment gate when one is given.
    ///
    /// The gate must belong to the same form, be unlocked, and not have been
    /// consumed yet. Consumption and insert share one transaction, so a gate
    /// backs exactly one submission. Returns `None` when the gate could not
    /// be consumed (nothing is written).
    pub async fn create(
        pool: &PgPool,
        input: &CreateSubmission,
        gate_token: Option<Uuid>,
    ) -> Result<Option<FormSubmission>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if let Some(token) = gate_token {
            let consumed = sqlx::query(
                "UPDATE payment_gates SET consumed_at = NOW()
                 WHERE token = $1 AND form_id = $2 AND state = $3 AND consumed_at IS NULL",
            )
            .bind(token)
            .bind(input.form_id)
            .bind(GateState::Unlocked.as_str())
            .execute(&mut *tx)
            .await?;
            if consumed.rows_affected() == 0 {
                return Ok(None);
            }
        }

        let query = format!(
            "INSERT INTO form_submissions (form_id, form_title, answers, payment, meta)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let submission = sqlx::query_as::<_, FormSubmission>(&query)
            .bind(input.form_id)
            .bind(&input.form_title)
            .bind(&input.answers)
            .bind(input.payment.as_ref().map(Json))
            .bind(&input.meta)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(submission))
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<FormSubmission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM form_submissions WHERE id = $1");
        sqlx::query_as::<_, FormSubmission>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of submissions, newest first, filtered by status and/or form.
    pub async fn list(
        pool: &PgPool,
        filter: SubmissionFilter<'_>,
        cursor: Option<PageCursor>,
        limit: i64,
    ) -> Result<Vec<FormSubmission>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM form_submissions
             WHERE ($1::TEXT IS NULL OR status = $1)
               AND ($2::BIGINT IS NULL OR form_id = $2)
               AND ($3::TIMESTAMPTZ IS NULL OR (created_at, id) < ($3, $4))
             ORDER BY created_at DESC, id DESC
             LIMIT $5"
        );
        sqlx::query_as::<_, FormSubmission>(&query)
            .bind(filter.status)
            .bind(filter.form_id)
            .bind(cursor.map(|c| c.at))
            .bind(cursor.map(|c| c.id))
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<FormSubmission>, sqlx::Error> {
        let query = format!(
            "UPDATE form_submissions SET status = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FormSubmission>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Set `payment.verification`. Returns `None` if the submission does not
    /// exist or carries no payment snapshot.
    pub async fn set_verification(
        pool: &PgPool,
        id: DbId,
        verification: &str,
    ) -> Result<Option<FormSubmission>, sqlx::Error> {
        let query = format!(
            "UPDATE form_submissions
             SET payment = jsonb_set(payment, '{{verification}}', to_jsonb($2::TEXT))
             WHERE id = $1 AND payment IS NOT NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FormSubmission>(&query)
            .bind(id)
            .bind(verification)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM form_submissions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
