//! Payment gate model.

use ong_core::error::CoreError;
use ong_core::payment::GateState;
use ong_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `payment_gates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PaymentGate {
    #[serde(skip_serializing)]
    pub id: DbId,
    pub token: Uuid,
    pub form_id: DbId,
    pub state: String,
    pub plan_code: Option<String>,
    pub plan_label: Option<String>,
    pub amount: Option<i64>,
    pub pay_link: Option<String>,
    pub proof_url: Option<String>,
    #[serde(skip_serializing)]
    pub proof_path: Option<String>,
    pub proof_content_type: Option<String>,
    pub proof_size_bytes: Option<i64>,
    pub consumed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PaymentGate {
    pub fn gate_state(&self) -> Result<GateState, CoreError> {
        GateState::parse(&self.state)
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed_at.is_some()
    }
}

/// Selected plan details written onto a gate.
#[derive(Debug, Clone)]
pub struct GatePlan {
    pub plan_code: String,
    pub plan_label: String,
    pub amount: i64,
    pub pay_link: String,
}

/// Stored proof details written onto a gate.
#[derive(Debug, Clone)]
pub struct GateProof {
    pub proof_url: String,
    pub proof_path: String,
    pub content_type: String,
    pub size_bytes: i64,
}
