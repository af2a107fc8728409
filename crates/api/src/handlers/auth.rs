//! Handlers for the `/auth` resource (login, current admin, admin accounts).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use ong_core::error::CoreError;
use ong_core::lockout::{lock_after_failure, remaining_lock_secs};
use ong_core::roles::ROLE_ADMIN;
use ong_db::models::admin_user::{AdminUserResponse, CreateAdminUser};
use ong_db::repositories::AdminUserRepo;
use ong_db::DbPool;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Email address is not valid"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request body for `POST /auth/admins`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAdminRequest {
    #[validate(email(message = "Email address is not valid"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: AdminUserResponse,
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Five consecutive failures lock the
/// account for thirty seconds.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    input.validate()?;

    let user = AdminUserRepo::find_by_email(&state.pool, input.email.trim())
        .await?
        .ok_or_else(invalid_credentials)?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let now = Utc::now();
    if let Some(secs) = remaining_lock_secs(user.locked_until, now) {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Account is temporarily locked. Try again in {secs}s"
        ))));
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        let failed = AdminUserRepo::increment_failed_login(&state.pool, user.id).await?;
        if let Some(until) = lock_after_failure(failed, now) {
            AdminUserRepo::lock_account(&state.pool, user.id, until).await?;
            tracing::warn!(user_id = user.id, failed, "Admin account locked after failed logins");
        }
        return Err(invalid_credentials());
    }

    AdminUserRepo::record_successful_login(&state.pool, user.id).await?;

    let access_token = generate_access_token(user.id, ROLE_ADMIN, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "Admin logged in");

    Ok(Json(AuthResponse {
        access_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: user.into(),
    }))
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<AdminUserResponse>>> {
    let user = AdminUserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AdminUser",
            id: auth.user_id,
        }))?;
    Ok(Json(DataResponse { data: user.into() }))
}

/// GET /api/v1/auth/admins
pub async fn list_admins(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<AdminUserResponse>>>> {
    let users = AdminUserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: users.into_iter().map(Into::into).collect(),
    }))
}

/// POST /api/v1/auth/admins
///
/// The email must be on the `ADMIN_EMAILS` allowlist when one is set.
pub async fn create_admin(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateAdminRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<AdminUserResponse>>)> {
    input.validate()?;
    let user = create_admin_account(&state.pool, &state.config, &input.email, &input.password)
        .await?;
    tracing::info!(created_by = admin.user_id, user_id = user.id, "Admin account created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_admin_account(
    pool: &DbPool,
    config: &ServerConfig,
    email: &str,
    password: &str,
) -> AppResult<AdminUserResponse> {
    if !config.is_admin_email(email) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Email is not on the admin allowlist".into(),
        )));
    }
    validate_password_strength(password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = AdminUserRepo::create(
        pool,
        &CreateAdminUser {
            email: email.trim().to_string(),
            password_hash,
        },
    )
    .await?;
    Ok(user.into())
}

/// Create the configured bootstrap admin when no admin exists yet.
///
/// Returns whether an account was created.
pub async fn ensure_bootstrap_admin(pool: &DbPool, config: &ServerConfig) -> AppResult<bool> {
    let Some(bootstrap) = &config.bootstrap_admin else {
        return Ok(false);
    };
    if AdminUserRepo::count(pool).await? > 0 {
        return Ok(false);
    }
    let user = create_admin_account(pool, config, &bootstrap.email, &bootstrap.password).await?;
    tracing::info!(user_id = user.id, email = %user.email, "Bootstrap admin created");
    Ok(true)
}
