//! Project showcase model and DTOs.

use chrono::NaiveDate;
use ong_core::pagination::PageCursor;
use ong_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub title: String,
    pub summary: String,
    pub impact: String,
    pub location: String,
    pub period: String,
    pub is_featured: bool,
    pub is_active: bool,
    pub cover_url: String,
    pub cover_path: String,
    pub project_date: NaiveDate,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    pub fn cursor(&self) -> PageCursor {
        PageCursor::new(self.updated_at, self.id)
    }
}

/// DTO for creating a project.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub title: String,
    pub summary: String,
    pub impact: String,
    pub location: String,
    pub period: String,
    pub is_featured: bool,
    pub is_active: bool,
    pub cover_url: String,
    pub cover_path: String,
    pub project_date: NaiveDate,
}

/// DTO for updating a project. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub impact: Option<String>,
    pub location: Option<String>,
    pub period: Option<String>,
    pub is_featured: Option<bool>,
    pub is_active: Option<bool>,
    pub cover_url: Option<String>,
    pub cover_path: Option<String>,
    pub project_date: Option<NaiveDate>,
}
