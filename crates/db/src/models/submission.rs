//! Form submission model and DTOs.

use ong_core::pagination::PageCursor;
use ong_core::payment::PaymentSnapshot;
use ong_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `form_submissions` table.
///
/// `form_id` is not a foreign key: a submission keeps its answers after the
/// form is edited or deleted.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FormSubmission {
    pub id: DbId,
    pub form_id: DbId,
    pub form_title: String,
    /// Answers keyed by field id.
    pub answers: serde_json::Value,
    pub status: String,
    pub payment: Option<Json<PaymentSnapshot>>,
    /// Request context (page, user agent).
    pub meta: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl FormSubmission {
    pub fn cursor(&self) -> PageCursor {
        PageCursor::new(self.created_at, self.id)
    }
}

/// DTO for inserting a submission.
#[derive(Debug, Clone)]
pub struct CreateSubmission {
    pub form_id: DbId,
    pub form_title: String,
    pub answers: serde_json::Value,
    pub payment: Option<PaymentSnapshot>,
    pub meta: serde_json::Value,
}

/// Filters for the admin submissions list.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubmissionFilter<'a> {
    pub status: Option<&'a str>,
    pub form_id: Option<DbId>,
}
