//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /login    -> login
/// GET  /me       -> me (requires auth)
/// GET  /admins   -> list_admins (admin only)
/// POST /admins   -> create_admin (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
        .route("/admins", get(auth::list_admins).post(auth::create_admin))
}
