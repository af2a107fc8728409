//! Route definitions for the section gates.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::config;
use crate::state::AppState;

/// Public routes mounted at `/config`.
///
/// ```text
/// GET /        -> list_gates
/// GET /{key}   -> get_gate
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(config::list_gates))
        .route("/{key}", get(config::get_gate))
}

/// Admin routes mounted at `/admin/config`.
///
/// ```text
/// PUT /{key}   -> update_gate
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new().route("/{key}", put(config::update_gate))
}
