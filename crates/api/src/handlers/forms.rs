//! Admin handlers for registration forms and their question editor.
//!
//! Field edits load the stored array into a [`FieldDraft`], apply one
//! operation, and write the whole array back. Concurrent editors of the same
//! form are last-write-wins.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use ong_core::error::CoreError;
use ong_core::field_draft::FieldDraft;
use ong_core::fields::FieldInput;
use ong_core::forms::{form_description, form_title};
use ong_core::pagination::Page;
use ong_core::payment::{validate_plans, PaymentPlan};
use ong_core::types::DbId;
use ong_db::models::form::{CreateForm, Form, UpdateForm};
use ong_db::repositories::FormRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::CursorParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/forms`.
#[derive(Debug, Deserialize)]
pub struct CreateFormRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fields: Vec<FieldInput>,
    #[serde(default)]
    pub payment_plans: Vec<PaymentPlan>,
}

/// Request body for `PUT /admin/forms/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateFormRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub payment_plans: Option<Vec<PaymentPlan>>,
}

/// Request body for `PUT /admin/forms/{id}/fields`.
#[derive(Debug, Deserialize)]
pub struct ReplaceFieldsRequest {
    pub fields: Vec<FieldInput>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Form", id })
}

async fn load_form(state: &AppState, id: DbId) -> AppResult<Form> {
    FormRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// Load, edit and persist a form's questions.
///
/// Nothing is written when `edit` fails or reports no change.
async fn edit_fields<F>(state: &AppState, id: DbId, edit: F) -> AppResult<Form>
where
    F: FnOnce(&mut FieldDraft) -> Result<bool, CoreError>,
{
    let form = load_form(state, id).await?;
    let mut draft = FieldDraft::new(form.fields.0.clone());
    if !edit(&mut draft)? {
        return Ok(form);
    }
    draft.validate_for_save()?;
    FormRepo::replace_fields(&state.pool, id, draft.fields())
        .await?
        .ok_or_else(|| not_found(id))
}

// ---------------------------------------------------------------------------
// Form handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/forms?cursor=&limit=
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<CursorParams>,
) -> AppResult<Json<DataResponse<Page<Form>>>> {
    let (cursor, limit) = params.resolve()?;
    let rows = FormRepo::list(&state.pool, cursor, limit).await?;
    Ok(Json(DataResponse {
        data: Page::from_rows(rows, limit, Form::cursor),
    }))
}

/// GET /api/v1/admin/forms/{id}
pub async fn get(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Form>>> {
    let form = load_form(&state, id).await?;
    Ok(Json(DataResponse { data: form }))
}

/// POST /api/v1/admin/forms
///
/// New forms start inactive. The question list may be empty here; it must
/// be filled before the form is activated.
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateFormRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Form>>)> {
    let draft = FieldDraft::from_inputs(&input.fields)?;
    if !draft.is_empty() {
        draft.validate_for_save()?;
    }
    let create = CreateForm {
        title: form_title(&input.title)?,
        description: form_description(&input.description),
        fields: draft.into_fields(),
        payment_plans: validate_plans(&input.payment_plans)?,
    };
    let form = FormRepo::create(&state.pool, &create).await?;
    tracing::info!(user_id = admin.user_id, form_id = form.id, "Form created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: form })))
}

/// PUT /api/v1/admin/forms/{id}
///
/// Updates title, description and payment plans. An empty plan list removes
/// the payment step.
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateFormRequest>,
) -> AppResult<Json<DataResponse<Form>>> {
    let update = UpdateForm {
        title: input.title.as_deref().map(form_title).transpose()?,
        description: input.description.as_deref().map(form_description),
        payment_plans: input.payment_plans.as_deref().map(validate_plans).transpose()?,
    };
    let form = FormRepo::update(&state.pool, id, &update)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: form }))
}

/// DELETE /api/v1/admin/forms/{id}
///
/// Submissions keep their answers and form title.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !FormRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(user_id = admin.user_id, form_id = id, "Form deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/forms/{id}/activate
///
/// Deactivates every other form in the same transaction.
pub async fn activate(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Form>>> {
    let form = load_form(&state, id).await?;
    if form.fields.0.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Add at least one question before activating the form".into(),
        )));
    }
    let form = FormRepo::activate(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(user_id = admin.user_id, form_id = id, "Form activated");
    Ok(Json(DataResponse { data: form }))
}

/// POST /api/v1/admin/forms/{id}/deactivate
pub async fn deactivate(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Form>>> {
    let form = FormRepo::deactivate(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: form }))
}

// ---------------------------------------------------------------------------
// Question editor handlers
// ---------------------------------------------------------------------------

/// PUT /api/v1/admin/forms/{id}/fields
///
/// Replaces the whole question list. Inputs carrying an `id` keep it.
pub async fn replace_fields(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ReplaceFieldsRequest>,
) -> AppResult<Json<DataResponse<Form>>> {
    let draft = FieldDraft::from_inputs(&input.fields)?;
    draft.validate_for_save()?;
    let form = FormRepo::replace_fields(&state.pool, id, draft.fields())
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: form }))
}

/// POST /api/v1/admin/forms/{id}/fields
pub async fn add_field(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<FieldInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Form>>)> {
    let form = edit_fields(&state, id, |draft| draft.add(&input).map(|_| true)).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: form })))
}

/// PUT /api/v1/admin/forms/{id}/fields/{index}
///
/// Replaces the question at `index`, keeping its id.
pub async fn edit_field(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((id, index)): Path<(DbId, usize)>,
    Json(input): Json<FieldInput>,
) -> AppResult<Json<DataResponse<Form>>> {
    let form = edit_fields(&state, id, |draft| draft.edit(index, &input).map(|_| true)).await?;
    Ok(Json(DataResponse { data: form }))
}

/// DELETE /api/v1/admin/forms/{id}/fields/{index}
///
/// Removing the last question is refused since an empty list cannot be saved.
pub async fn remove_field(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((id, index)): Path<(DbId, usize)>,
) -> AppResult<Json<DataResponse<Form>>> {
    let form = edit_fields(&state, id, |draft| draft.remove(index).map(|_| true)).await?;
    Ok(Json(DataResponse { data: form }))
}

/// POST /api/v1/admin/forms/{id}/fields/{index}/move-up
///
/// No-op for the first question.
pub async fn move_field_up(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((id, index)): Path<(DbId, usize)>,
) -> AppResult<Json<DataResponse<Form>>> {
    let form = edit_fields(&state, id, |draft| Ok(draft.move_up(index))).await?;
    Ok(Json(DataResponse { data: form }))
}

/// POST /api/v1/admin/forms/{id}/fields/{index}/move-down
///
/// No-op for the last question.
pub async fn move_field_down(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((id, index)): Path<(DbId, usize)>,
) -> AppResult<Json<DataResponse<Form>>> {
    let form = edit_fields(&state, id, |draft| Ok(draft.move_down(index))).await?;
    Ok(Json(DataResponse { data: form }))
}
