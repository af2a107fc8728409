//! Admin handlers for registration submissions.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use ong_core::error::CoreError;
use ong_core::fields::{labeled_answers, LabeledAnswer};
use ong_core::pagination::Page;
use ong_core::status::{
    resolve_status_filter, submission_status_value, PaymentVerification, SubmissionStatus,
};
use ong_core::types::DbId;
use ong_db::models::submission::{FormSubmission, SubmissionFilter};
use ong_db::repositories::{FormRepo, SubmissionRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::{page_args, SubmissionListParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// A submission with its answers ordered and labeled by the form's
/// current questions.
#[derive(Debug, Serialize)]
pub struct SubmissionDetail {
    pub submission: FormSubmission,
    pub answers: Vec<LabeledAnswer>,
}

/// Request body for `PUT /admin/submissions/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

/// Request body for `PUT /admin/submissions/{id}/verification`.
#[derive(Debug, Deserialize)]
pub struct SetVerificationRequest {
    pub verification: String,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "FormSubmission",
        id,
    })
}

/// GET /api/v1/admin/submissions?status=&form_id=&cursor=&limit=
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<SubmissionListParams>,
) -> AppResult<Json<DataResponse<Page<FormSubmission>>>> {
    let status = resolve_status_filter(params.status.as_deref(), submission_status_value)?;
    let (cursor, limit) = page_args(params.cursor.as_deref(), params.limit)?;
    let filter = SubmissionFilter {
        status,
        form_id: params.form_id,
    };
    let rows = SubmissionRepo::list(&state.pool, filter, cursor, limit).await?;
    Ok(Json(DataResponse {
        data: Page::from_rows(rows, limit, FormSubmission::cursor),
    }))
}

/// GET /api/v1/admin/submissions/{id}
///
/// Answers to questions that were since removed from the form are listed
/// last under their raw id.
pub async fn get(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SubmissionDetail>>> {
    let submission = SubmissionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let fields = FormRepo::find_by_id(&state.pool, submission.form_id)
        .await?
        .map(|form| form.fields.0)
        .unwrap_or_default();
    let answers = match submission.answers.as_object() {
        Some(map) => labeled_answers(&fields, map),
        None => Vec::new(),
    };

    Ok(Json(DataResponse {
        data: SubmissionDetail {
            submission,
            answers,
        },
    }))
}

/// PUT /api/v1/admin/submissions/{id}/status
pub async fn set_status(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetStatusRequest>,
) -> AppResult<Json<DataResponse<FormSubmission>>> {
    let status = SubmissionStatus::parse(input.status.trim())?;
    let submission = SubmissionRepo::set_status(&state.pool, id, status.as_str())
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: submission }))
}

/// PUT /api/v1/admin/submissions/{id}/verification
///
/// Marks the uploaded proof as verified or rejected. Only submissions that
/// went through the payment gate carry a verification.
pub async fn set_verification(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetVerificationRequest>,
) -> AppResult<Json<DataResponse<FormSubmission>>> {
    let verification = PaymentVerification::parse(input.verification.trim())?;

    let existing = SubmissionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if existing.payment.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "This submission has no payment to verify".into(),
        )));
    }

    let submission = SubmissionRepo::set_verification(&state.pool, id, verification.as_str())
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(
        submission_id = id,
        verification = verification.as_str(),
        admin_id = admin.user_id,
        "Payment verification updated"
    );
    Ok(Json(DataResponse { data: submission }))
}

/// DELETE /api/v1/admin/submissions/{id}
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !SubmissionRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}
