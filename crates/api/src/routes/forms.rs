//! Route definitions for registration forms: the public flow and the admin
//! builder.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{forms, registration};
use crate::state::AppState;

/// Public routes mounted at `/forms`.
///
/// ```text
/// GET  /public                        -> list_public
/// GET  /{id}/public                   -> get_public
/// POST /{id}/pages/{page}/validate    -> check_page
/// POST /{id}/gates                    -> open_gate
/// POST /{id}/submissions              -> submit
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/public", get(registration::list_public))
        .route("/{id}/public", get(registration::get_public))
        .route(
            "/{id}/pages/{page}/validate",
            post(registration::check_page),
        )
        .route("/{id}/gates", post(registration::open_gate))
        .route("/{id}/submissions", post(registration::submit))
}

/// Public routes mounted at `/gates`.
///
/// ```text
/// GET  /{token}             -> get_gate
/// POST /{token}/plan        -> select_plan
/// POST /{token}/open-link   -> open_link
/// POST /{token}/proof       -> upload_proof (multipart)
/// ```
pub fn gate_router() -> Router<AppState> {
    Router::new()
        .route("/{token}", get(registration::get_gate))
        .route("/{token}/plan", post(registration::select_plan))
        .route("/{token}/open-link", post(registration::open_link))
        .route("/{token}/proof", post(registration::upload_proof))
}

/// Admin routes mounted at `/admin/forms`.
///
/// ```text
/// GET    /                                -> list
/// POST   /                                -> create
/// GET    /{id}                            -> get
/// PUT    /{id}                            -> update
/// DELETE /{id}                            -> delete
/// POST   /{id}/activate                   -> activate
/// POST   /{id}/deactivate                 -> deactivate
/// PUT    /{id}/fields                     -> replace_fields
/// POST   /{id}/fields                     -> add_field
/// PUT    /{id}/fields/{index}             -> edit_field
/// DELETE /{id}/fields/{index}             -> remove_field
/// POST   /{id}/fields/{index}/move-up     -> move_field_up
/// POST   /{id}/fields/{index}/move-down   -> move_field_down
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(forms::list).post(forms::create))
        .route(
            "/{id}",
            get(forms::get).put(forms::update).delete(forms::delete),
        )
        .route("/{id}/activate", post(forms::activate))
        .route("/{id}/deactivate", post(forms::deactivate))
        .route(
            "/{id}/fields",
            put(forms::replace_fields).post(forms::add_field),
        )
        .route(
            "/{id}/fields/{index}",
            put(forms::edit_field).delete(forms::remove_field),
        )
        .route("/{id}/fields/{index}/move-up", post(forms::move_field_up))
        .route(
            "/{id}/fields/{index}/move-down",
            post(forms::move_field_down),
        )
}
