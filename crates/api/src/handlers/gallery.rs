//! Handlers for gallery albums and photos.
//!
//! Album and photo uploads are multipart; metadata-only photo edits are
//! JSON. Storage objects are removed best-effort after their rows.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use ong_core::error::CoreError;
use ong_core::gallery::{
    album_description, album_title, batch_order, caption, clamp_order, CASCADE_PHOTO_LIMIT,
    MAX_FILES_PER_BATCH, MAX_URLS_PER_BATCH, PUBLIC_ALBUM_LIMIT, PUBLIC_PHOTO_LIMIT,
};
use ong_core::pagination::Page;
use ong_core::sanitize::{clean_url, extract_urls};
use ong_core::types::DbId;
use ong_core::uploads::{album_cover_key, album_photo_key, validate_image, UploadedFile};
use ong_db::models::gallery::{Album, CreateAlbum, CreatePhoto, Photo, UpdateAlbum, UpdatePhoto};
use ong_db::repositories::{AlbumRepo, PhotoRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::CursorParams;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::uploads::{remove_best_effort, store_file, MultipartForm};

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `PUT /admin/albums/{id}/photos/{photo_id}`.
#[derive(Debug, Deserialize)]
pub struct UpdatePhotoRequest {
    pub caption: Option<String>,
    pub sort_order: Option<i64>,
    pub is_active: Option<bool>,
}

/// Result of a batch add.
#[derive(Debug, Serialize)]
pub struct PhotoBatch {
    pub album: Album,
    pub photos: Vec<Photo>,
}

/// Result of purging broken photos.
#[derive(Debug, Serialize)]
pub struct PurgeResult {
    pub removed: usize,
    pub album: Album,
}

fn album_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Album", id })
}

fn photo_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Photo", id })
}

async fn load_album(state: &AppState, id: DbId) -> AppResult<Album> {
    AlbumRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| album_not_found(id))
}

/// Optional http(s) URL from a form part. Blank is `None`; junk is rejected.
fn optional_url(raw: Option<&str>, what: &str) -> AppResult<Option<String>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => clean_url(value).map(Some).ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "{what} must be an http(s) URL"
            )))
        }),
    }
}

/// Store an album cover file, returning `(url, key)`.
async fn store_cover(state: &AppState, file: UploadedFile) -> AppResult<(String, String)> {
    validate_image(&file)?;
    let key = album_cover_key(Utc::now(), &file.extension("jpg"));
    let stored = store_file(state.store.as_ref(), &key, file).await?;
    Ok((stored.url, stored.key))
}

// ---------------------------------------------------------------------------
// Public handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/gallery/albums
pub async fn list_public_albums(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Album>>>> {
    let albums = AlbumRepo::list_public(&state.pool, PUBLIC_ALBUM_LIMIT).await?;
    Ok(Json(DataResponse { data: albums }))
}

/// GET /api/v1/gallery/albums/{id}/photos
///
/// Hidden albums are reported as missing.
pub async fn list_public_photos(
    State(state): State<AppState>,
    Path(album_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Photo>>>> {
    let album = load_album(&state, album_id).await?;
    if !album.is_active {
        return Err(album_not_found(album_id));
    }
    let photos = PhotoRepo::list_public(&state.pool, album_id, PUBLIC_PHOTO_LIMIT).await?;
    Ok(Json(DataResponse { data: photos }))
}

// ---------------------------------------------------------------------------
// Admin album handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/albums?cursor=&limit=
pub async fn list_albums(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<CursorParams>,
) -> AppResult<Json<DataResponse<Page<Album>>>> {
    let (cursor, limit) = params.resolve()?;
    let rows = AlbumRepo::list(&state.pool, cursor, limit).await?;
    Ok(Json(DataResponse {
        data: Page::from_rows(rows, limit, Album::cursor),
    }))
}

/// GET /api/v1/admin/albums/{id}
pub async fn get_album(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Album>>> {
    let album = load_album(&state, id).await?;
    Ok(Json(DataResponse { data: album }))
}

/// POST /api/v1/admin/albums
///
/// Multipart: `title`, `description`, `sort_order`, `is_active`, and either
/// a `cover` image file or a `cover_url`.
pub async fn create_album(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Album>>)> {
    let mut form = MultipartForm::read(multipart).await?;

    let title = album_title(form.text("title").unwrap_or(""))?;
    let description = album_description(form.text("description").unwrap_or(""));
    let sort_order = clamp_order(form.int("sort_order")?);
    let is_active = form.flag("is_active").unwrap_or(true);
    let cover_url = optional_url(form.text("cover_url"), "Cover URL")?;

    let (cover_url, cover_storage_path) = match form.take_file("cover") {
        Some(file) => store_cover(&state, file).await?,
        None => (cover_url.unwrap_or_default(), String::new()),
    };

    let input = CreateAlbum {
        title,
        description,
        sort_order,
        is_active,
        cover_url,
        cover_storage_path,
    };
    let album = match AlbumRepo::create(&state.pool, &input).await {
        Ok(album) => album,
        Err(e) => {
            remove_best_effort(state.store.as_ref(), &input.cover_storage_path).await;
            return Err(e.into());
        }
    };

    tracing::info!(user_id = admin.user_id, album_id = album.id, "Album created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: album })))
}

/// PUT /api/v1/admin/albums/{id}
///
/// Multipart with the same parts as create; absent parts keep their value.
/// A new cover replaces (and deletes) the previously uploaded one.
pub async fn update_album(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<Album>>> {
    let existing = load_album(&state, id).await?;
    let mut form = MultipartForm::read(multipart).await?;

    let mut input = UpdateAlbum {
        title: form.text("title").map(album_title).transpose()?,
        description: form.text("description").map(album_description),
        sort_order: form.int("sort_order")?.map(|o| clamp_order(Some(o))),
        is_active: form.flag("is_active"),
        ..Default::default()
    };

    let mut replaced_path = None;
    if let Some(file) = form.take_file("cover") {
        let (url, key) = store_cover(&state, file).await?;
        input.cover_url = Some(url);
        input.cover_storage_path = Some(key);
        replaced_path = Some(existing.cover_storage_path.clone());
    } else if let Some(url) = optional_url(form.text("cover_url"), "Cover URL")? {
        if url != existing.cover_url {
            input.cover_url = Some(url);
            input.cover_storage_path = Some(String::new());
            replaced_path = Some(existing.cover_storage_path.clone());
        }
    }

    let album = AlbumRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| album_not_found(id))?;

    if let Some(old) = replaced_path {
        remove_best_effort(state.store.as_ref(), &old).await;
    }
    Ok(Json(DataResponse { data: album }))
}

/// DELETE /api/v1/admin/albums/{id}
///
/// Removes up to [`CASCADE_PHOTO_LIMIT`] photos with their objects, then the
/// album row (the foreign key cascades the rest) and its cover object.
pub async fn delete_album(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_album(&state, id).await?;

    let photos = PhotoRepo::delete_for_album(&state.pool, id, CASCADE_PHOTO_LIMIT).await?;
    for photo in &photos {
        remove_best_effort(state.store.as_ref(), &photo.storage_path).await;
    }

    let album = AlbumRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| album_not_found(id))?;
    remove_best_effort(state.store.as_ref(), &album.cover_storage_path).await;

    tracing::info!(
        user_id = admin.user_id,
        album_id = id,
        photos = photos.len(),
        "Album deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/albums/{id}/recount
pub async fn recount_album(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Album>>> {
    let album = AlbumRepo::recount(&state.pool, id)
        .await?
        .ok_or_else(|| album_not_found(id))?;
    Ok(Json(DataResponse { data: album }))
}

// ---------------------------------------------------------------------------
// Admin photo handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/albums/{id}/photos?cursor=&limit=
pub async fn list_photos(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(album_id): Path<DbId>,
    Query(params): Query<CursorParams>,
) -> AppResult<Json<DataResponse<Page<Photo>>>> {
    load_album(&state, album_id).await?;
    let (cursor, limit) = params.resolve()?;
    let rows = PhotoRepo::list(&state.pool, album_id, cursor, limit).await?;
    Ok(Json(DataResponse {
        data: Page::from_rows(rows, limit, Photo::cursor),
    }))
}

/// POST /api/v1/admin/albums/{id}/photos
///
/// Multipart: up to [`MAX_FILES_PER_BATCH`] image files, a free-text `urls`
/// part, plus `caption`, `order_start` and `is_active` applied to every new
/// photo. All files are checked before anything is uploaded.
pub async fn add_photos(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(album_id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<PhotoBatch>>)> {
    load_album(&state, album_id).await?;
    let mut form = MultipartForm::read(multipart).await?;

    let caption = caption(form.text("caption").unwrap_or(""));
    let order_start = clamp_order(form.int("order_start")?);
    let is_active = form.flag("is_active").unwrap_or(true);
    let urls = extract_urls(form.text("urls").unwrap_or(""), MAX_URLS_PER_BATCH);
    let files = form.take_files();

    if files.is_empty() && urls.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Add at least one image file or URL".into(),
        )));
    }
    if files.len() > MAX_FILES_PER_BATCH {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Upload at most {MAX_FILES_PER_BATCH} files per batch ({} given)",
            files.len()
        ))));
    }
    for file in &files {
        validate_image(file)?;
    }

    let mut sources: Vec<(String, String)> = Vec::with_capacity(files.len() + urls.len());
    for file in files {
        let key = album_photo_key(album_id, &file.extension("jpg"));
        match store_file(state.store.as_ref(), &key, file).await {
            Ok(stored) => sources.push((stored.url, stored.key)),
            Err(e) => {
                discard_uploads(&state, &sources).await;
                return Err(e);
            }
        }
    }
    sources.extend(urls.into_iter().map(|url| (url, String::new())));

    let photos: Vec<CreatePhoto> = sources
        .iter()
        .enumerate()
        .map(|(i, (url, path))| CreatePhoto {
            caption: caption.clone(),
            sort_order: batch_order(order_start, i),
            is_active,
            image_url: url.clone(),
            storage_path: path.clone(),
        })
        .collect();

    let created = match PhotoRepo::create_batch(&state.pool, album_id, &photos).await {
        Ok(Some(created)) => created,
        Ok(None) => {
            discard_uploads(&state, &sources).await;
            return Err(album_not_found(album_id));
        }
        Err(e) => {
            discard_uploads(&state, &sources).await;
            return Err(e.into());
        }
    };

    let album = load_album(&state, album_id).await?;
    tracing::info!(
        user_id = admin.user_id,
        album_id,
        added = created.len(),
        "Photos added"
    );
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: PhotoBatch {
                album,
                photos: created,
            },
        }),
    ))
}

async fn discard_uploads(state: &AppState, sources: &[(String, String)]) {
    for (_, path) in sources {
        remove_best_effort(state.store.as_ref(), path).await;
    }
}

/// PUT /api/v1/admin/albums/{id}/photos/{photo_id}
pub async fn update_photo(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((album_id, photo_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdatePhotoRequest>,
) -> AppResult<Json<DataResponse<Photo>>> {
    let photo = PhotoRepo::find_by_id(&state.pool, photo_id)
        .await?
        .filter(|p| p.album_id == album_id)
        .ok_or_else(|| photo_not_found(photo_id))?;

    let update = UpdatePhoto {
        caption: input.caption.as_deref().map(caption),
        sort_order: input.sort_order.map(|o| clamp_order(Some(o))),
        is_active: input.is_active,
    };
    let photo = PhotoRepo::update(&state.pool, photo.id, &update)
        .await?
        .ok_or_else(|| photo_not_found(photo_id))?;
    Ok(Json(DataResponse { data: photo }))
}

/// DELETE /api/v1/admin/albums/{id}/photos/{photo_id}
pub async fn delete_photo(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((album_id, photo_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let photo = PhotoRepo::delete(&state.pool, album_id, photo_id)
        .await?
        .ok_or_else(|| photo_not_found(photo_id))?;
    remove_best_effort(state.store.as_ref(), &photo.storage_path).await;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/albums/{id}/purge-invalid
///
/// Deletes photos whose URL is not http(s) or is truncated.
pub async fn purge_invalid_photos(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(album_id): Path<DbId>,
) -> AppResult<Json<DataResponse<PurgeResult>>> {
    load_album(&state, album_id).await?;
    let removed = PhotoRepo::purge_invalid(&state.pool, album_id).await?;
    for photo in &removed {
        remove_best_effort(state.store.as_ref(), &photo.storage_path).await;
    }
    let album = load_album(&state, album_id).await?;
    tracing::info!(
        user_id = admin.user_id,
        album_id,
        removed = removed.len(),
        "Invalid photos purged"
    );
    Ok(Json(DataResponse {
        data: PurgeResult {
            removed: removed.len(),
            album,
        },
    }))
}
