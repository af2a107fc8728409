//! Handlers for the project showcase.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use ong_core::error::CoreError;
use ong_core::pagination::Page;
use ong_core::projects::{parse_project_date, ProjectTexts, FEATURED_LIMIT, PUBLIC_LIST_LIMIT};
use ong_core::sanitize::clean_url;
use ong_core::types::DbId;
use ong_core::uploads::{project_cover_key, validate_image};
use ong_db::models::project::{CreateProject, Project, UpdateProject};
use ong_db::repositories::ProjectRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::{CursorParams, FeaturedParams};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::uploads::{remove_best_effort, store_file, MultipartForm};

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Project",
        id,
    })
}

/// A cover chosen in the form: a fresh upload, a URL, or nothing.
enum CoverChoice {
    Uploaded { url: String, key: String },
    Linked(String),
    Keep,
}

async fn read_cover(state: &AppState, form: &mut MultipartForm) -> AppResult<CoverChoice> {
    if let Some(file) = form.take_file("cover") {
        validate_image(&file)?;
        let key = project_cover_key(Utc::now(), &file.extension("jpg"));
        let stored = store_file(state.store.as_ref(), &key, file).await?;
        return Ok(CoverChoice::Uploaded {
            url: stored.url,
            key: stored.key,
        });
    }
    match form.text("cover_url").map(str::trim) {
        None | Some("") => Ok(CoverChoice::Keep),
        Some(raw) => clean_url(raw).map(CoverChoice::Linked).ok_or_else(|| {
            AppError::Core(CoreError::Validation("Cover URL must be an http(s) URL".into()))
        }),
    }
}

/// GET /api/v1/projects?featured=true
///
/// Active projects, featured first. `featured=true` returns only featured
/// ones for the home page.
pub async fn list_public(
    State(state): State<AppState>,
    Query(params): Query<FeaturedParams>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let limit = if params.featured {
        FEATURED_LIMIT
    } else {
        PUBLIC_LIST_LIMIT
    };
    let projects = ProjectRepo::list_public(&state.pool, params.featured, limit).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/admin/projects?cursor=&limit=
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<CursorParams>,
) -> AppResult<Json<DataResponse<Page<Project>>>> {
    let (cursor, limit) = params.resolve()?;
    let rows = ProjectRepo::list(&state.pool, cursor, limit).await?;
    Ok(Json(DataResponse {
        data: Page::from_rows(rows, limit, Project::cursor),
    }))
}

/// GET /api/v1/admin/projects/{id}
pub async fn get(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: project }))
}

/// POST /api/v1/admin/projects
///
/// Multipart: `title`, `summary`, `impact`, `location`, `period`,
/// `project_date` (YYYY-MM-DD, default today), `is_featured`, `is_active`,
/// and a `cover` file or `cover_url`.
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    let mut form = MultipartForm::read(multipart).await?;

    let texts = ProjectTexts::clean(
        form.text("title").unwrap_or(""),
        form.text("summary").unwrap_or(""),
        form.text("impact").unwrap_or(""),
        form.text("location").unwrap_or(""),
        form.text("period").unwrap_or(""),
    )?;
    let project_date = parse_project_date(form.text("project_date"), Utc::now().date_naive())?;
    let is_featured = form.flag("is_featured").unwrap_or(false);
    let is_active = form.flag("is_active").unwrap_or(true);

    let (cover_url, cover_path) = match read_cover(&state, &mut form).await? {
        CoverChoice::Uploaded { url, key } => (url, key),
        CoverChoice::Linked(url) => (url, String::new()),
        CoverChoice::Keep => (String::new(), String::new()),
    };

    let input = CreateProject {
        title: texts.title,
        summary: texts.summary,
        impact: texts.impact,
        location: texts.location,
        period: texts.period,
        is_featured,
        is_active,
        cover_url,
        cover_path,
        project_date,
    };
    let project = match ProjectRepo::create(&state.pool, &input).await {
        Ok(project) => project,
        Err(e) => {
            remove_best_effort(state.store.as_ref(), &input.cover_path).await;
            return Err(e.into());
        }
    };

    tracing::info!(user_id = admin.user_id, project_id = project.id, "Project created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// PUT /api/v1/admin/projects/{id}
///
/// Multipart with the same parts as create. Absent parts keep the stored
/// value, including the cover.
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<Project>>> {
    let existing = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let mut form = MultipartForm::read(multipart).await?;

    let texts = ProjectTexts::clean(
        form.text("title").unwrap_or(&existing.title),
        form.text("summary").unwrap_or(&existing.summary),
        form.text("impact").unwrap_or(&existing.impact),
        form.text("location").unwrap_or(&existing.location),
        form.text("period").unwrap_or(&existing.period),
    )?;
    let project_date = match form.text("project_date").map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(parse_project_date(Some(raw), existing.project_date)?),
    };

    let mut input = UpdateProject {
        title: Some(texts.title),
        summary: Some(texts.summary),
        impact: Some(texts.impact),
        location: Some(texts.location),
        period: Some(texts.period),
        is_featured: form.flag("is_featured"),
        is_active: form.flag("is_active"),
        project_date,
        ..Default::default()
    };

    let mut replaced_path = None;
    match read_cover(&state, &mut form).await? {
        CoverChoice::Uploaded { url, key } => {
            input.cover_url = Some(url);
            input.cover_path = Some(key);
            replaced_path = Some(existing.cover_path.clone());
        }
        CoverChoice::Linked(url) if url != existing.cover_url => {
            input.cover_url = Some(url);
            input.cover_path = Some(String::new());
            replaced_path = Some(existing.cover_path.clone());
        }
        CoverChoice::Linked(_) | CoverChoice::Keep => {}
    }

    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    if let Some(old) = replaced_path {
        remove_best_effort(state.store.as_ref(), &old).await;
    }
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/admin/projects/{id}
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let project = ProjectRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    remove_best_effort(state.store.as_ref(), &project.cover_path).await;
    tracing::info!(user_id = admin.user_id, project_id = id, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}
