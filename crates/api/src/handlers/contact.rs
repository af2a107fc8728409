//! Handlers for contact messages: the public form and the admin inbox.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use ong_core::contact::ContactInput;
use ong_core::error::CoreError;
use ong_core::pagination::Page;
use ong_core::site_config::GateKey;
use ong_core::status::{contact_status_value, resolve_status_filter, ContactStatus};
use ong_core::throttle::SubmissionKind;
use ong_core::types::{DbId, Timestamp};
use ong_db::models::contact::{ContactMessage, CreateContactMessage};
use ong_db::repositories::ContactRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::config::ensure_gate_open;
use crate::middleware::client::ClientAddr;
use crate::middleware::rbac::RequireAdmin;
use crate::query::{page_args, StatusListParams};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// What the visitor gets back after sending a message.
#[derive(Debug, Serialize)]
pub struct ContactReceipt {
    pub id: DbId,
    pub created_at: Timestamp,
}

/// Request body for `PUT /admin/contacts/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "ContactMessage",
        id,
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/contact
///
/// Refused with 409 while the `contacto` gate is closed.
pub async fn submit(
    State(state): State<AppState>,
    ClientAddr(client): ClientAddr,
    Json(input): Json<ContactInput>,
) -> AppResult<(StatusCode, Json<DataResponse<ContactReceipt>>)> {
    ensure_gate_open(&state.pool, GateKey::Contacto).await?;
    let clean = input.clean()?;
    state.check_throttle(SubmissionKind::Contact, &client)?;

    let message = ContactRepo::create(&state.pool, &CreateContactMessage::from(clean)).await?;
    tracing::info!(contact_id = message.id, "Contact message received");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ContactReceipt {
                id: message.id,
                created_at: message.created_at,
            },
        }),
    ))
}

/// GET /api/v1/admin/contacts?status=&cursor=&limit=
///
/// `status` defaults to `new`; `all` lists every message.
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<StatusListParams>,
) -> AppResult<Json<DataResponse<Page<ContactMessage>>>> {
    let status = resolve_status_filter(params.status.as_deref(), contact_status_value)?;
    let (cursor, limit) = page_args(params.cursor.as_deref(), params.limit)?;
    let rows = ContactRepo::list(&state.pool, status, cursor, limit).await?;
    Ok(Json(DataResponse {
        data: Page::from_rows(rows, limit, ContactMessage::cursor),
    }))
}

/// GET /api/v1/admin/contacts/{id}
pub async fn get(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ContactMessage>>> {
    let message = ContactRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: message }))
}

/// PUT /api/v1/admin/contacts/{id}/status
pub async fn set_status(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetStatusRequest>,
) -> AppResult<Json<DataResponse<ContactMessage>>> {
    let status = ContactStatus::parse(input.status.trim())?;
    let message = ContactRepo::set_status(&state.pool, id, status.as_str())
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: message }))
}

/// DELETE /api/v1/admin/contacts/{id}
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ContactRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}
