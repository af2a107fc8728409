//! Admin account model and DTOs.

use ong_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full row from the `admin_users` table.
///
/// Contains the password hash. Use [`AdminUserResponse`] for API output.
#[derive(Debug, Clone, FromRow)]
pub struct AdminUser {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Admin representation safe to return from the API.
#[derive(Debug, Clone, Serialize)]
pub struct AdminUserResponse {
    pub id: DbId,
    pub email: String,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<AdminUser> for AdminUserResponse {
    fn from(user: AdminUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_active: user.is_active,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

/// DTO for inserting an admin. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateAdminUser {
    pub email: String,
    pub password_hash: String,
}
