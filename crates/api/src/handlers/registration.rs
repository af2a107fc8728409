//! Public registration flow: form listing, page checks, the manual payment
//! gate, and the final submission.
//!
//! A form with payment plans only accepts a submission backed by an unlocked
//! gate for that same form. The gate is consumed by the submission.

use axum::extract::{Multipart, Path, State};
use axum::http::header::USER_AGENT;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use ong_core::error::CoreError;
use ong_core::fields::{
    collect_answers, paginate_fields, validate_page, Field, InvalidField, QUESTIONS_PER_PAGE,
};
use ong_core::forms::{PUBLIC_ACTIVE_LIMIT, PUBLIC_FALLBACK_LIMIT};
use ong_core::payment::{find_plan, GateState, PaymentSnapshot};
use ong_core::sanitize::{clean_line, truncate_chars};
use ong_core::site_config::GateKey;
use ong_core::status::PaymentVerification;
use ong_core::throttle::SubmissionKind;
use ong_core::types::{DbId, Timestamp};
use ong_core::uploads::{proof_key, validate_proof};
use ong_db::models::form::Form;
use ong_db::models::payment_gate::{GatePlan, GateProof, PaymentGate};
use ong_db::models::submission::CreateSubmission;
use ong_db::repositories::{FormRepo, PaymentGateRepo, SubmissionRepo};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::handlers::config::ensure_gate_open;
use crate::middleware::client::ClientAddr;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::uploads::{remove_best_effort, store_file, MultipartForm};

/// Stored user-agent length.
const USER_AGENT_MAX: usize = 180;

/// Stored page path length.
const PAGE_PATH_MAX: usize = 200;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// A payment plan as shown before checkout. The pay link is only handed out
/// by the open-link step.
#[derive(Debug, Serialize)]
pub struct PublicPlan {
    pub code: String,
    pub label: String,
    pub amount: i64,
}

/// A form as served to the registration page.
#[derive(Debug, Serialize)]
pub struct PublicForm {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub is_active: bool,
    pub fields: Vec<Field>,
    pub questions_per_page: usize,
    pub page_count: usize,
    pub requires_payment: bool,
    pub payment_plans: Vec<PublicPlan>,
}

impl From<Form> for PublicForm {
    fn from(form: Form) -> Self {
        let page_count = paginate_fields(&form.fields.0, QUESTIONS_PER_PAGE).len();
        let requires_payment = form.requires_payment();
        Self {
            id: form.id,
            title: form.title,
            description: form.description,
            is_active: form.is_active,
            questions_per_page: QUESTIONS_PER_PAGE,
            page_count,
            requires_payment,
            payment_plans: form
                .payment_plans
                .0
                .into_iter()
                .map(|p| PublicPlan {
                    code: p.code,
                    label: p.label,
                    amount: p.amount,
                })
                .collect(),
            fields: form.fields.0,
        }
    }
}

/// Forms listed on the registration page.
#[derive(Debug, Serialize)]
pub struct PublicFormList {
    pub forms: Vec<PublicForm>,
    /// `true` when no form is active and the most recent ones are shown.
    pub fallback: bool,
}

/// Request body for page validation.
#[derive(Debug, Deserialize)]
pub struct PageAnswers {
    #[serde(default)]
    pub answers: Map<String, Value>,
}

/// Result of validating one page.
#[derive(Debug, Serialize)]
pub struct PageCheck {
    pub valid: bool,
    /// First invalid field on the page, for the client to scroll to.
    pub invalid: Option<InvalidField>,
}

/// Request body for `POST /gates/{token}/plan`.
#[derive(Debug, Deserialize)]
pub struct SelectPlanRequest {
    pub plan_code: String,
}

/// Response of the open-link step.
#[derive(Debug, Serialize)]
pub struct CheckoutLink {
    pub pay_link: String,
    pub gate: PaymentGate,
}

/// Request body for `POST /forms/{id}/submissions`.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub answers: Map<String, Value>,
    /// Required when the form has payment plans.
    pub gate_token: Option<Uuid>,
    /// Page path the visitor submitted from.
    #[serde(default)]
    pub page: String,
}

/// What the visitor gets back after registering.
#[derive(Debug, Serialize)]
pub struct SubmissionReceipt {
    pub id: DbId,
    pub created_at: Timestamp,
}

fn form_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Form", id })
}

fn gate_not_found(token: Uuid) -> AppError {
    AppError::Core(CoreError::NotFoundByKey {
        entity: "Payment gate",
        key: token.to_string(),
    })
}

fn gate_moved_on() -> AppError {
    AppError::Core(CoreError::Conflict(
        "The payment step changed meanwhile. Reload and try again".into(),
    ))
}

async fn load_form(state: &AppState, id: DbId) -> AppResult<Form> {
    FormRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| form_not_found(id))
}

/// A gate that can still move forward.
async fn load_open_gate(state: &AppState, token: Uuid) -> AppResult<PaymentGate> {
    let gate = PaymentGateRepo::find_by_token(&state.pool, token)
        .await?
        .ok_or_else(|| gate_not_found(token))?;
    if gate.is_consumed() {
        return Err(AppError::Core(CoreError::Conflict(
            "This payment was already used for a registration".into(),
        )));
    }
    Ok(gate)
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

/// GET /api/v1/forms/public
///
/// Active forms, newest first. When none is active the most recently
/// updated forms are listed instead.
pub async fn list_public(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<PublicFormList>>> {
    let active = FormRepo::list_active(&state.pool, PUBLIC_ACTIVE_LIMIT).await?;
    let (forms, fallback) = if active.is_empty() {
        (FormRepo::list_recent(&state.pool, PUBLIC_FALLBACK_LIMIT).await?, true)
    } else {
        (active, false)
    };
    Ok(Json(DataResponse {
        data: PublicFormList {
            forms: forms.into_iter().map(PublicForm::from).collect(),
            fallback,
        },
    }))
}

/// GET /api/v1/forms/{id}/public
pub async fn get_public(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PublicForm>>> {
    let form = load_form(&state, id).await?;
    Ok(Json(DataResponse { data: form.into() }))
}

/// POST /api/v1/forms/{id}/pages/{page}/validate
///
/// `page` is zero-based. Always 200 unless the page does not exist.
pub async fn check_page(
    State(state): State<AppState>,
    Path((id, page)): Path<(DbId, usize)>,
    Json(input): Json<PageAnswers>,
) -> AppResult<Json<DataResponse<PageCheck>>> {
    let form = load_form(&state, id).await?;
    let invalid = validate_page(&form.fields.0, page, QUESTIONS_PER_PAGE, &input.answers)?;
    Ok(Json(DataResponse {
        data: PageCheck {
            valid: invalid.is_none(),
            invalid,
        },
    }))
}

// ---------------------------------------------------------------------------
// Payment gate
// ---------------------------------------------------------------------------

/// POST /api/v1/forms/{id}/gates
///
/// Open a payment gate for a form with plans. Starts with no plan chosen.
pub async fn open_gate(
    State(state): State<AppState>,
    Path(form_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<PaymentGate>>)> {
    ensure_gate_open(&state.pool, GateKey::Inscripciones).await?;
    let form = load_form(&state, form_id).await?;
    if !form.requires_payment() {
        return Err(AppError::Core(CoreError::Validation(
            "This form has no payment step".into(),
        )));
    }
    let gate = PaymentGateRepo::create(&state.pool, form.id).await?;
    tracing::debug!(form_id, token = %gate.token, "Payment gate opened");
    Ok((StatusCode::CREATED, Json(DataResponse { data: gate })))
}

/// GET /api/v1/gates/{token}
pub async fn get_gate(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
) -> AppResult<Json<DataResponse<PaymentGate>>> {
    let gate = PaymentGateRepo::find_by_token(&state.pool, token)
        .await?
        .ok_or_else(|| gate_not_found(token))?;
    Ok(Json(DataResponse { data: gate }))
}

/// POST /api/v1/gates/{token}/plan
///
/// Choose (or change) the plan. Changing it requires opening the link again.
pub async fn select_plan(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
    Json(input): Json<SelectPlanRequest>,
) -> AppResult<Json<DataResponse<PaymentGate>>> {
    let gate = load_open_gate(&state, token).await?;
    gate.gate_state()?.select_plan()?;

    let form = load_form(&state, gate.form_id).await?;
    let plan = find_plan(&form.payment_plans.0, &input.plan_code)?;
    let plan = GatePlan {
        plan_code: plan.code.clone(),
        plan_label: plan.label.clone(),
        amount: plan.amount,
        pay_link: plan.pay_link.clone(),
    };

    let gate = PaymentGateRepo::select_plan(&state.pool, token, &plan)
        .await?
        .ok_or_else(gate_moved_on)?;
    Ok(Json(DataResponse { data: gate }))
}

/// POST /api/v1/gates/{token}/open-link
///
/// Marks the checkout link as opened and returns it. This verifies nothing
/// about the payment itself.
pub async fn open_link(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
) -> AppResult<Json<DataResponse<CheckoutLink>>> {
    let gate = load_open_gate(&state, token).await?;
    let gate = if gate.gate_state()?.open_link()? == GateState::Unlocked {
        gate
    } else {
        PaymentGateRepo::mark_link_opened(&state.pool, token)
            .await?
            .ok_or_else(gate_moved_on)?
    };
    let pay_link = gate.pay_link.clone().unwrap_or_default();
    Ok(Json(DataResponse {
        data: CheckoutLink { pay_link, gate },
    }))
}

/// POST /api/v1/gates/{token}/proof
///
/// Multipart with a `file` part: an image or PDF up to 8 MiB. Unlocks the
/// gate once stored.
pub async fn upload_proof(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<PaymentGate>>> {
    let gate = load_open_gate(&state, token).await?;
    gate.gate_state()?.accept_proof()?;

    let mut form = MultipartForm::read(multipart).await?;
    let file = form.take_file("file").ok_or_else(|| {
        AppError::Core(CoreError::Validation("Attach the proof of payment".into()))
    })?;
    validate_proof(&file)?;

    let key = proof_key(
        Utc::now(),
        gate.form_id,
        &gate.token.simple().to_string(),
        &file.extension("bin"),
    );
    let content_type = file.content_type.clone();
    let size_bytes = i64::try_from(file.size()).unwrap_or(i64::MAX);
    let stored = store_file(state.store.as_ref(), &key, file).await?;

    let proof = GateProof {
        proof_url: stored.url,
        proof_path: stored.key,
        content_type,
        size_bytes,
    };
    let gate = match PaymentGateRepo::record_proof(&state.pool, token, &proof).await {
        Ok(Some(gate)) => gate,
        Ok(None) => {
            remove_best_effort(state.store.as_ref(), &proof.proof_path).await;
            return Err(gate_moved_on());
        }
        Err(e) => {
            remove_best_effort(state.store.as_ref(), &proof.proof_path).await;
            return Err(e.into());
        }
    };

    tracing::info!(form_id = gate.form_id, token = %token, "Payment proof uploaded");
    Ok(Json(DataResponse { data: gate }))
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// POST /api/v1/forms/{id}/submissions
///
/// Re-validates every question, checks the payment gate when the form has
/// plans, and stores one submission with status `new`.
pub async fn submit(
    State(state): State<AppState>,
    ClientAddr(client): ClientAddr,
    Path(form_id): Path<DbId>,
    headers: HeaderMap,
    Json(input): Json<SubmitRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SubmissionReceipt>>)> {
    ensure_gate_open(&state.pool, GateKey::Inscripciones).await?;
    let form = load_form(&state, form_id).await?;
    if form.fields.0.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "This form has no questions yet".into(),
        )));
    }

    let answers = collect_answers(&form.fields.0, &input.answers).map_err(CoreError::from)?;
    let answers = serde_json::to_value(&answers)
        .map_err(|e| AppError::InternalError(format!("Answer encoding error: {e}")))?;

    let payment = if form.requires_payment() {
        let token = input.gate_token.ok_or_else(|| {
            AppError::Core(CoreError::Forbidden(
                "Upload the proof of payment to continue".into(),
            ))
        })?;
        let gate = load_open_gate(&state, token).await?;
        if gate.form_id != form.id {
            return Err(AppError::Core(CoreError::Forbidden(
                "This payment belongs to another form".into(),
            )));
        }
        gate.gate_state()?.require_unlocked()?;
        Some(PaymentSnapshot {
            gate_token: token.to_string(),
            plan_code: gate.plan_code.unwrap_or_default(),
            plan_label: gate.plan_label.unwrap_or_default(),
            amount: gate.amount.unwrap_or_default(),
            proof_url: gate.proof_url.unwrap_or_default(),
            proof_path: gate.proof_path.unwrap_or_default(),
            verification: PaymentVerification::Pending,
        })
    } else {
        None
    };

    state.check_throttle(SubmissionKind::Registration, &client)?;

    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let gate_token = payment.as_ref().and(input.gate_token);
    let create = CreateSubmission {
        form_id: form.id,
        form_title: form.title.clone(),
        answers,
        payment,
        meta: json!({
            "page": clean_line(&input.page, PAGE_PATH_MAX),
            "ua": truncate_chars(user_agent, USER_AGENT_MAX),
        }),
    };

    let submission = match SubmissionRepo::create(&state.pool, &create, gate_token).await {
        Ok(Some(submission)) => submission,
        Ok(None) => {
            state.release_throttle(SubmissionKind::Registration, &client);
            return Err(AppError::Core(CoreError::Conflict(
                "This payment was already used for a registration".into(),
            )));
        }
        Err(e) => {
            state.release_throttle(SubmissionKind::Registration, &client);
            return Err(e.into());
        }
    };

    tracing::info!(
        form_id,
        submission_id = submission.id,
        paid = gate_token.is_some(),
        "Registration received"
    );
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SubmissionReceipt {
                id: submission.id,
                created_at: submission.created_at,
            },
        }),
    ))
}
