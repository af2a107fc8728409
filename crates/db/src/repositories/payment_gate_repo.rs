//! Repository for the `payment_gates` table.
//!
//! Transitions are validated by [`GateState`] in the caller; each update
//! here re-checks the expected source state in its `WHERE` clause so a
//! concurrent request cannot skip a step.

use ong_core::payment::GateState;
use ong_core::types::DbId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::payment_gate::{GatePlan, GateProof, PaymentGate};

const COLUMNS: &str = "id, token, form_id, state, plan_code, plan_label, amount, pay_link, \
                       proof_url, proof_path, proof_content_type, proof_size_bytes, \
                       consumed_at, created_at, updated_at";

/// Provides the server-side payment gate state.
pub struct PaymentGateRepo;

impl PaymentGateRepo {
    /// Open a new gate for a form in the `no_plan` state.
    pub async fn create(pool: &PgPool, form_id: DbId) -> Result<PaymentGate, sqlx::Error> {
        let query = format!(
            "INSERT INTO payment_gates (token, form_id, state)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PaymentGate>(&query)
            .bind(Uuid::new_v4())
            .bind(form_id)
            .bind(GateState::NoPlan.as_str())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_token(
        pool: &PgPool,
        token: Uuid,
    ) -> Result<Option<PaymentGate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payment_gates WHERE token = $1");
        sqlx::query_as::<_, PaymentGate>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// Record the chosen plan and reset the link-opened step.
    pub async fn select_plan(
        pool: &PgPool,
        token: Uuid,
        plan: &GatePlan,
    ) -> Result<Option<PaymentGate>, sqlx::Error> {
        let query = format!(
            "UPDATE payment_gates SET
                state = $2,
                plan_code = $3,
                plan_label = $4,
                amount = $5,
                pay_link = $6
             WHERE token = $1 AND state <> $7 AND consumed_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PaymentGate>(&query)
            .bind(token)
            .bind(GateState::PlanSelected.as_str())
            .bind(&plan.plan_code)
            .bind(&plan.plan_label)
            .bind(plan.amount)
            .bind(&plan.pay_link)
            .bind(GateState::Unlocked.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Record that the checkout link was opened.
    pub async fn mark_link_opened(
        pool: &PgPool,
        token: Uuid,
    ) -> Result<Option<PaymentGate>, sqlx::Error> {
        let query = format!(
            "UPDATE payment_gates SET state = $2
             WHERE token = $1 AND state IN ($3, $2) AND consumed_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PaymentGate>(&query)
            .bind(token)
            .bind(GateState::LinkOpened.as_str())
            .bind(GateState::PlanSelected.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Attach the uploaded proof and unlock the gate.
    pub async fn record_proof(
        pool: &PgPool,
        token: Uuid,
        proof: &GateProof,
    ) -> Result<Option<PaymentGate>, sqlx::Error> {
        let query = format!(
            "UPDATE payment_gates SET
                state = $2,
                proof_url = $3,
                proof_path = $4,
                proof_content_type = $5,
                proof_size_bytes = $6
             WHERE token = $1 AND state = $7 AND consumed_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PaymentGate>(&query)
            .bind(token)
            .bind(GateState::Unlocked.as_str())
            .bind(&proof.proof_url)
            .bind(&proof.proof_path)
            .bind(&proof.content_type)
            .bind(proof.size_bytes)
            .bind(GateState::LinkOpened.as_str())
            .fetch_optional(pool)
            .await
    }
}
