//! Shared query parameter types for API handlers.

use ong_core::error::CoreError;
use ong_core::pagination::{clamp_limit, PageCursor, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use ong_core::types::DbId;
use serde::Deserialize;

/// Keyset pagination parameters (`?cursor=&limit=`).
#[derive(Debug, Default, Deserialize)]
pub struct CursorParams {
    pub cursor: Option<String>,
    pub limit: Option<i64>,
}

impl CursorParams {
    /// Parse the cursor and clamp the page size.
    pub fn resolve(&self) -> Result<(Option<PageCursor>, i64), CoreError> {
        page_args(self.cursor.as_deref(), self.limit)
    }
}

/// Pagination plus a status filter (`?status=new|read|...|all`).
#[derive(Debug, Default, Deserialize)]
pub struct StatusListParams {
    pub status: Option<String>,
    pub cursor: Option<String>,
    pub limit: Option<i64>,
}

/// Filters for the admin submissions list.
#[derive(Debug, Default, Deserialize)]
pub struct SubmissionListParams {
    pub status: Option<String>,
    pub form_id: Option<DbId>,
    pub cursor: Option<String>,
    pub limit: Option<i64>,
}

/// `?featured=true` on the public projects list.
#[derive(Debug, Default, Deserialize)]
pub struct FeaturedParams {
    #[serde(default)]
    pub featured: bool,
}

pub fn page_args(
    cursor: Option<&str>,
    limit: Option<i64>,
) -> Result<(Option<PageCursor>, i64), CoreError> {
    let cursor = PageCursor::parse_opt(cursor)?;
    Ok((cursor, clamp_limit(limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE)))
}
