//! Route definitions for projects.

use axum::routing::get;
use axum::Router;

use crate::handlers::projects;
use crate::state::AppState;

/// Public routes mounted at `/projects`.
///
/// ```text
/// GET /?featured=true   -> list_public
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new().route("/", get(projects::list_public))
}

/// Admin routes mounted at `/admin/projects`.
///
/// ```text
/// GET    /       -> list
/// POST   /       -> create (multipart)
/// GET    /{id}   -> get
/// PUT    /{id}   -> update (multipart)
/// DELETE /{id}   -> delete
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list).post(projects::create))
        .route(
            "/{id}",
            get(projects::get)
                .put(projects::update)
                .delete(projects::delete),
        )
}
