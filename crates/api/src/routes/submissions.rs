//! Route definitions for the `/admin/submissions` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::submissions;
use crate::state::AppState;

/// Routes mounted at `/admin/submissions`.
///
/// ```text
/// GET    /                      -> list
/// GET    /{id}                  -> get
/// DELETE /{id}                  -> delete
/// PUT    /{id}/status           -> set_status
/// PUT    /{id}/verification     -> set_verification
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(submissions::list))
        .route(
            "/{id}",
            get(submissions::get).delete(submissions::delete),
        )
        .route("/{id}/status", put(submissions::set_status))
        .route("/{id}/verification", put(submissions::set_verification))
}
