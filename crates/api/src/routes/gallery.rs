//! Route definitions for the photo gallery.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;
use ong_core::gallery::PHOTO_BATCH_BODY_BYTES;

use crate::handlers::gallery;
use crate::state::AppState;

/// Public routes mounted at `/gallery`.
///
/// ```text
/// GET /albums               -> list_public_albums
/// GET /albums/{id}/photos   -> list_public_photos
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/albums", get(gallery::list_public_albums))
        .route("/albums/{id}/photos", get(gallery::list_public_photos))
}

/// Admin routes mounted at `/admin/albums`.
///
/// ```text
/// GET    /                           -> list_albums
/// POST   /                           -> create_album (multipart)
/// GET    /{id}                       -> get_album
/// PUT    /{id}                       -> update_album (multipart)
/// DELETE /{id}                       -> delete_album
/// POST   /{id}/recount               -> recount_album
/// POST   /{id}/purge-invalid         -> purge_invalid_photos
/// GET    /{id}/photos                -> list_photos
/// POST   /{id}/photos                -> add_photos (multipart)
/// PUT    /{id}/photos/{photo_id}     -> update_photo
/// DELETE /{id}/photos/{photo_id}     -> delete_photo
/// ```
///
/// The batch photo route gets its own body cap, sized for a full batch of
/// images at the per-file limit.
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(gallery::list_albums).post(gallery::create_album))
        .route(
            "/{id}",
            get(gallery::get_album)
                .put(gallery::update_album)
                .delete(gallery::delete_album),
        )
        .route("/{id}/recount", post(gallery::recount_album))
        .route("/{id}/purge-invalid", post(gallery::purge_invalid_photos))
        .route(
            "/{id}/photos",
            get(gallery::list_photos)
                .post(gallery::add_photos)
                .layer(DefaultBodyLimit::max(PHOTO_BATCH_BODY_BYTES)),
        )
        .route(
            "/{id}/photos/{photo_id}",
            put(gallery::update_photo).delete(gallery::delete_photo),
        )
}
