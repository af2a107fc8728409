pub mod auth;
pub mod config;
pub mod contact;
pub mod forms;
pub mod gallery;
pub mod health;
pub mod projects;
pub mod submissions;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws/config                                       WebSocket (gate updates)
///
/// /auth/login                                      login (public)
/// /auth/me                                         current admin
/// /auth/admins                                     list, create (admin only)
///
/// /contact                                         submit message (public)
/// /config                                          list gates (public)
/// /config/{key}                                    get gate (public)
/// /gallery/albums                                  active albums (public)
/// /gallery/albums/{id}/photos                      active photos (public)
/// /projects                                        public projects
///
/// /forms/public                                    forms open for registration
/// /forms/{id}/public                               one form with its questions
/// /forms/{id}/pages/{page}/validate                check one page of answers
/// /forms/{id}/gates                                open a payment gate
/// /forms/{id}/submissions                          register
/// /gates/{token}                                   gate state
/// /gates/{token}/plan                              choose a plan
/// /gates/{token}/open-link                         open checkout link
/// /gates/{token}/proof                             upload proof of payment
///
/// /admin/contacts                                  inbox
/// /admin/contacts/{id}                             get, delete
/// /admin/contacts/{id}/status                      set status
///
/// /admin/config/{key}                              update a gate
///
/// /admin/albums                                    list, create
/// /admin/albums/{id}                               get, update, delete
/// /admin/albums/{id}/recount                       repair photo count
/// /admin/albums/{id}/purge-invalid                 drop photos without a URL
/// /admin/albums/{id}/photos                        list, add batch
/// /admin/albums/{id}/photos/{photo_id}             update, delete
///
/// /admin/forms                                     list, create
/// /admin/forms/{id}                                get, update, delete
/// /admin/forms/{id}/activate                       make the single active form
/// /admin/forms/{id}/deactivate                     close registrations
/// /admin/forms/{id}/fields                         replace all, add one
/// /admin/forms/{id}/fields/{index}                 edit, remove
/// /admin/forms/{id}/fields/{index}/move-up         reorder
/// /admin/forms/{id}/fields/{index}/move-down       reorder
///
/// /admin/submissions                               list (status/form filters)
/// /admin/submissions/{id}                          get, delete
/// /admin/submissions/{id}/status                   set status
/// /admin/submissions/{id}/verification             verify or reject payment
///
/// /admin/projects                                  list, create
/// /admin/projects/{id}                             get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Live gate updates for the public site.
        .route("/ws/config", get(ws::ws_handler))
        // Authentication and admin accounts.
        .nest("/auth", auth::router())
        // Public site.
        .nest("/contact", contact::public_router())
        .nest("/config", config::public_router())
        .nest("/gallery", gallery::public_router())
        .nest("/projects", projects::public_router())
        // Registration flow.
        .nest("/forms", forms::public_router())
        .nest("/gates", forms::gate_router())
        // Admin console.
        .nest("/admin/contacts", contact::admin_router())
        .nest("/admin/config", config::admin_router())
        .nest("/admin/albums", gallery::admin_router())
        .nest("/admin/forms", forms::admin_router())
        .nest("/admin/submissions", submissions::router())
        .nest("/admin/projects", projects::admin_router())
}
