//! Repository for the `projects` table.

use ong_core::pagination::PageCursor;
use ong_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, summary, impact, location, period, is_featured, is_active, \
                       cover_url, cover_path, project_date, created_at, updated_at";

/// Provides CRUD operations for showcased projects.
pub struct ProjectRepo;

impl ProjectRepo {
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects
                (title, summary, impact, location, period, is_featured, is_active,
                 cover_url, cover_path, project_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.title)
            .bind(&input.summary)
            .bind(&input.impact)
            .bind(&input.location)
            .bind(&input.period)
            .bind(input.is_featured)
            .bind(input.is_active)
            .bind(&input.cover_url)
            .bind(&input.cover_path)
            .bind(input.project_date)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of projects for the admin console, most recently updated first.
    pub async fn list(
        pool: &PgPool,
        cursor: Option<PageCursor>,
        limit: i64,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE ($1::TIMESTAMPTZ IS NULL OR (updated_at, id) < ($1, $2))
             ORDER BY updated_at DESC, id DESC
             LIMIT $3"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(cursor.map(|c| c.at))
            .bind(cursor.map(|c| c.id))
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Active projects for the public site: featured first, then newest date.
    pub async fn list_public(
        pool: &PgPool,
        featured_only: bool,
        limit: i64,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE is_active AND (NOT $1 OR is_featured)
             ORDER BY is_featured DESC, project_date DESC, id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(featured_only)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                title = COALESCE($2, title),
                summary = COALESCE($3, summary),
                impact = COALESCE($4, impact),
                location = COALESCE($5, location),
                period = COALESCE($6, period),
                is_featured = COALESCE($7, is_featured),
                is_active = COALESCE($8, is_active),
                cover_url = COALESCE($9, cover_url),
                cover_path = COALESCE($10, cover_path),
                project_date = COALESCE($11, project_date)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.summary)
            .bind(&input.impact)
            .bind(&input.location)
            .bind(&input.period)
            .bind(input.is_featured)
            .bind(input.is_active)
            .bind(&input.cover_url)
            .bind(&input.cover_path)
            .bind(input.project_date)
            .fetch_optional(pool)
            .await
    }

    /// Delete a project, returning the removed row for cover cleanup.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("DELETE FROM projects WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
