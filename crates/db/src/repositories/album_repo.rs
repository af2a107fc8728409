//! Repository for the `gallery_albums` table.

use ong_core::pagination::PageCursor;
use ong_core::types::DbId;
use sqlx::PgPool;

use crate::models::gallery::{Album, CreateAlbum, UpdateAlbum};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, sort_order, is_active, cover_url, \
                       cover_storage_path, photo_count, created_at, updated_at";

/// Provides CRUD operations for gallery albums.
pub struct AlbumRepo;

impl AlbumRepo {
    /// Insert a new album with a zero photo count.
    pub async fn create(pool: &PgPool, input: &CreateAlbum) -> Result<Album, sqlx::Error> {
        let query = format!(
            "INSERT INTO gallery_albums
                (title, description, sort_order, is_active, cover_url, cover_storage_path)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Album>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.sort_order)
            .bind(input.is_active)
            .bind(&input.cover_url)
            .bind(&input.cover_storage_path)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Album>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM gallery_albums WHERE id = $1");
        sqlx::query_as::<_, Album>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of albums for the admin console, newest first.
    pub async fn list(
        pool: &PgPool,
        cursor: Option<PageCursor>,
        limit: i64,
    ) -> Result<Vec<Album>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM gallery_albums
             WHERE ($1::TIMESTAMPTZ IS NULL OR (created_at, id) < ($1, $2))
             ORDER BY created_at DESC, id DESC
             LIMIT $3"
        );
        sqlx::query_as::<_, Album>(&query)
            .bind(cursor.map(|c| c.at))
            .bind(cursor.map(|c| c.id))
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Active albums for the public gallery, by display order.
    pub async fn list_public(pool: &PgPool, limit: i64) -> Result<Vec<Album>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM gallery_albums
             WHERE is_active
             ORDER BY sort_order, created_at DESC, id DESC
             LIMIT $1"
        );
        sqlx::query_as::<_, Album>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Update an album. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAlbum,
    ) -> Result<Option<Album>, sqlx::Error> {
        let query = format!(
            "UPDATE gallery_albums SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                sort_order = COALESCE($4, sort_order),
                is_active = COALESCE($5, is_active),
                cover_url = COALESCE($6, cover_url),
                cover_storage_path = COALESCE($7, cover_storage_path)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Album>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.sort_order)
            .bind(input.is_active)
            .bind(&input.cover_url)
            .bind(&input.cover_storage_path)
            .fetch_optional(pool)
            .await
    }

    /// Reset `photo_count` to the real number of photo rows.
    pub async fn recount(pool: &PgPool, id: DbId) -> Result<Option<Album>, sqlx::Error> {
        let query = format!(
            "UPDATE gallery_albums SET
                photo_count = (SELECT COUNT(*) FROM gallery_photos WHERE album_id = $1)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Album>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete an album row. Remaining photos go with it (`ON DELETE CASCADE`).
    ///
    /// Returns the deleted row so the caller can clean up the cover object.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Album>, sqlx::Error> {
        let query = format!("DELETE FROM gallery_albums WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Album>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
