//! Gallery album and photo models and DTOs.

use ong_core::pagination::PageCursor;
use ong_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `gallery_albums` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Album {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub cover_url: String,
    pub cover_storage_path: String,
    /// Denormalized count of rows in `gallery_photos` for this album.
    pub photo_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Album {
    pub fn cursor(&self) -> PageCursor {
        PageCursor::new(self.created_at, self.id)
    }
}

/// DTO for creating an album.
#[derive(Debug, Clone)]
pub struct CreateAlbum {
    pub title: String,
    pub description: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub cover_url: String,
    pub cover_storage_path: String,
}

/// DTO for updating an album. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateAlbum {
    pub title: Option<String>,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
    pub cover_url: Option<String>,
    pub cover_storage_path: Option<String>,
}

/// A row from the `gallery_photos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Photo {
    pub id: DbId,
    pub album_id: DbId,
    pub caption: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub image_url: String,
    /// Empty when the photo is an external link.
    pub storage_path: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Photo {
    pub fn cursor(&self) -> PageCursor {
        PageCursor::new(self.created_at, self.id)
    }
}

/// DTO for inserting one photo of a batch.
#[derive(Debug, Clone)]
pub struct CreatePhoto {
    pub caption: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub image_url: String,
    pub storage_path: String,
}

/// DTO for updating a photo's metadata.
#[derive(Debug, Clone, Default)]
pub struct UpdatePhoto {
    pub caption: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}
