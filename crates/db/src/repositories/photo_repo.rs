//! Repository for the `gallery_photos` table.
//!
//! Every insert or delete adjusts the parent album's `photo_count` in the
//! same transaction.

use ong_core::pagination::PageCursor;
use ong_core::types::DbId;
use sqlx::PgPool;

use crate::models::gallery::{CreatePhoto, Photo, UpdatePhoto};

const COLUMNS: &str = "id, album_id, caption, sort_order, is_active, image_url, storage_path, \
                       created_at, updated_at";

/// Provides CRUD operations for album photos.
pub struct PhotoRepo;

impl PhotoRepo {
    /// Insert a batch of photos into an album.
    ///
    /// Increments `photo_count` by the number inserted and, if the album has
    /// no cover yet, uses the first photo's URL as cover. Returns `None` when
    /// the album does not exist (nothing is written).
    pub async fn create_batch(
        pool: &PgPool,
        album_id: DbId,
        photos: &[CreatePhoto],
    ) -> Result<Option<Vec<Photo>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Lock the album row so concurrent batches serialize on the counter.
        let exists: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM gallery_albums WHERE id = $1 FOR UPDATE")
                .bind(album_id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO gallery_photos
                (album_id, caption, sort_order, is_active, image_url, storage_path)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let mut created = Vec::with_capacity(photos.len());
        for photo in photos {
            let row = sqlx::query_as::<_, Photo>(&query)
                .bind(album_id)
                .bind(&photo.caption)
                .bind(photo.sort_order)
                .bind(photo.is_active)
                .bind(&photo.image_url)
                .bind(&photo.storage_path)
                .fetch_one(&mut *tx)
                .await?;
            created.push(row);
        }

        let first_url = created.first().map(|p| p.image_url.clone()).unwrap_or_default();
        sqlx::query(
            "UPDATE gallery_albums SET
                photo_count = photo_count + $2,
                cover_url = CASE WHEN cover_url = '' THEN $3 ELSE cover_url END
             WHERE id = $1",
        )
        .bind(album_id)
        .bind(created.len() as i32)
        .bind(first_url)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(created))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Photo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM gallery_photos WHERE id = $1");
        sqlx::query_as::<_, Photo>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of an album's photos for the admin console, newest first.
    pub async fn list(
        pool: &PgPool,
        album_id: DbId,
        cursor: Option<PageCursor>,
        limit: i64,
    ) -> Result<Vec<Photo>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM gallery_photos
             WHERE album_id = $1
               AND ($2::TIMESTAMPTZ IS NULL OR (created_at, id) < ($2, $3))
             ORDER BY created_at DESC, id DESC
             LIMIT $4"
        );
        sqlx::query_as::<_, Photo>(&query)
            .bind(album_id)
            .bind(cursor.map(|c| c.at))
            .bind(cursor.map(|c| c.id))
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Active photos of an album for the public gallery.
    pub async fn list_public(
        pool: &PgPool,
        album_id: DbId,
        limit: i64,
    ) -> Result<Vec<Photo>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM gallery_photos
             WHERE album_id = $1 AND is_active
             ORDER BY sort_order, created_at DESC, id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, Photo>(&query)
            .bind(album_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePhoto,
    ) -> Result<Option<Photo>, sqlx::Error> {
        let query = format!(
            "UPDATE gallery_photos SET
                caption = COALESCE($2, caption),
                sort_order = COALESCE($3, sort_order),
                is_active = COALESCE($4, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Photo>(&query)
            .bind(id)
            .bind(&input.caption)
            .bind(input.sort_order)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete one photo of `album_id` and decrement the album counter.
    ///
    /// Returns the deleted row (for storage cleanup), or `None` if no such
    /// photo belongs to the album.
    pub async fn delete(
        pool: &PgPool,
        album_id: DbId,
        id: DbId,
    ) -> Result<Option<Photo>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "DELETE FROM gallery_photos WHERE id = $1 AND album_id = $2 RETURNING {COLUMNS}"
        );
        let deleted = sqlx::query_as::<_, Photo>(&query)
            .bind(id)
            .bind(album_id)
            .fetch_optional(&mut *tx)
            .await?;

        if deleted.is_some() {
            decrement_count(&mut tx, album_id, 1).await?;
        }

        tx.commit().await?;
        Ok(deleted)
    }

    /// Delete up to `limit` photos of an album, returning the removed rows.
    ///
    /// Used before deleting the album itself so each photo's stored object
    /// can be cleaned up.
    pub async fn delete_for_album(
        pool: &PgPool,
        album_id: DbId,
        limit: i64,
    ) -> Result<Vec<Photo>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "DELETE FROM gallery_photos
             WHERE id IN (
                 SELECT id FROM gallery_photos WHERE album_id = $1
                 ORDER BY created_at DESC, id DESC
                 LIMIT $2
             )
             RETURNING {COLUMNS}"
        );
        let deleted = sqlx::query_as::<_, Photo>(&query)
            .bind(album_id)
            .bind(limit)
            .fetch_all(&mut *tx)
            .await?;

        decrement_count(&mut tx, album_id, deleted.len()).await?;
        tx.commit().await?;
        Ok(deleted)
    }

    /// Delete photos whose image URL is not a usable http(s) link.
    ///
    /// Mirrors [`ong_core::gallery::is_valid_photo_url`]: the URL must start
    /// with `http://` or `https://` and be at least 12 characters long.
    pub async fn purge_invalid(pool: &PgPool, album_id: DbId) -> Result<Vec<Photo>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "DELETE FROM gallery_photos
             WHERE album_id = $1
               AND (image_url !~* '^https?://' OR char_length(image_url) < 12)
             RETURNING {COLUMNS}"
        );
        let deleted = sqlx::query_as::<_, Photo>(&query)
            .bind(album_id)
            .fetch_all(&mut *tx)
            .await?;

        decrement_count(&mut tx, album_id, deleted.len()).await?;
        tx.commit().await?;
        Ok(deleted)
    }

    /// Count the photo rows of an album.
    pub async fn count_for_album(pool: &PgPool, album_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM gallery_photos WHERE album_id = $1")
            .bind(album_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }
}

async fn decrement_count(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    album_id: DbId,
    by: usize,
) -> Result<(), sqlx::Error> {
    if by == 0 {
        return Ok(());
    }
    sqlx::query(
        "UPDATE gallery_albums SET photo_count = GREATEST(photo_count - $2, 0) WHERE id = $1",
    )
    .bind(album_id)
    .bind(by as i32)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
