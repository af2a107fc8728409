//! Route definitions for contact messages.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::contact;
use crate::state::AppState;

/// Public routes mounted at `/contact`.
///
/// ```text
/// POST /   -> submit
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new().route("/", post(contact::submit))
}

/// Admin routes mounted at `/admin/contacts`.
///
/// ```text
/// GET    /              -> list
/// GET    /{id}          -> get
/// DELETE /{id}          -> delete
/// PUT    /{id}/status   -> set_status
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(contact::list))
        .route("/{id}", get(contact::get).delete(contact::delete))
        .route("/{id}/status", put(contact::set_status))
}
