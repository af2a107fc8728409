//! Registration form model and DTOs.

use ong_core::fields::Field;
use ong_core::pagination::PageCursor;
use ong_core::payment::PaymentPlan;
use ong_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `forms` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Form {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub is_active: bool,
    pub fields: Json<Vec<Field>>,
    pub payment_plans: Json<Vec<PaymentPlan>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Form {
    pub fn cursor(&self) -> PageCursor {
        PageCursor::new(self.updated_at, self.id)
    }

    /// Whether submissions must pass through the payment gate.
    pub fn requires_payment(&self) -> bool {
        !self.payment_plans.0.is_empty()
    }
}

/// DTO for creating a form. Forms start inactive.
#[derive(Debug, Clone)]
pub struct CreateForm {
    pub title: String,
    pub description: String,
    pub fields: Vec<Field>,
    pub payment_plans: Vec<PaymentPlan>,
}

/// DTO for updating form metadata. Fields are saved through
/// [`FormRepo::replace_fields`](crate::repositories::FormRepo::replace_fields).
#[derive(Debug, Clone, Default)]
pub struct UpdateForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub payment_plans: Option<Vec<PaymentPlan>>,
}
