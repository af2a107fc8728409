//! Integration tests for album/photo bookkeeping.
//!
//! - `photo_count` tracks inserts and deletes
//! - Cascade delete removes remaining photos
//! - Invalid URL purge and recount

use ong_db::models::gallery::{CreateAlbum, CreatePhoto};
use ong_db::repositories::{AlbumRepo, PhotoRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_album(title: &str) -> CreateAlbum {
    CreateAlbum {
        title: title.to_string(),
        description: String::new(),
        sort_order: 1,
        is_active: true,
        cover_url: String::new(),
        cover_storage_path: String::new(),
    }
}

fn new_photo(url: &str, order: i32) -> CreatePhoto {
    CreatePhoto {
        caption: String::new(),
        sort_order: order,
        is_active: true,
        image_url: url.to_string(),
        storage_path: String::new(),
    }
}

async fn assert_count_matches_rows(pool: &PgPool, album_id: i64) {
    let album = AlbumRepo::find_by_id(pool, album_id).await.unwrap().unwrap();
    let rows = PhotoRepo::count_for_album(pool, album_id).await.unwrap();
    assert_eq!(i64::from(album.photo_count), rows);
}

// ---------------------------------------------------------------------------
// Test: photo_count follows add/delete sequences
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_photo_count_tracks_rows(pool: PgPool) {
    let album = AlbumRepo::create(&pool, &new_album("Jornada")).await.unwrap();
    assert_eq!(album.photo_count, 0);

    let created = PhotoRepo::create_batch(
        &pool,
        album.id,
        &[
            new_photo("https://img.example.org/1.jpg", 1),
            new_photo("https://img.example.org/2.jpg", 2),
            new_photo("https://img.example.org/3.jpg", 3),
        ],
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(created.len(), 3);
    assert_count_matches_rows(&pool, album.id).await;

    let removed = PhotoRepo::delete(&pool, album.id, created[1].id).await.unwrap();
    assert!(removed.is_some());
    assert_count_matches_rows(&pool, album.id).await;

    // Deleting the same photo again is a no-op and must not decrement.
    let again = PhotoRepo::delete(&pool, album.id, created[1].id).await.unwrap();
    assert!(again.is_none());
    assert_count_matches_rows(&pool, album.id).await;

    let album = AlbumRepo::find_by_id(&pool, album.id).await.unwrap().unwrap();
    assert_eq!(album.photo_count, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_first_photo_becomes_cover(pool: PgPool) {
    let album = AlbumRepo::create(&pool, &new_album("Sin portada")).await.unwrap();
    PhotoRepo::create_batch(
        &pool,
        album.id,
        &[
            new_photo("https://img.example.org/a.jpg", 1),
            new_photo("https://img.example.org/b.jpg", 2),
        ],
    )
    .await
    .unwrap();

    let album = AlbumRepo::find_by_id(&pool, album.id).await.unwrap().unwrap();
    assert_eq!(album.cover_url, "https://img.example.org/a.jpg");

    // An existing cover is left alone.
    PhotoRepo::create_batch(&pool, album.id, &[new_photo("https://img.example.org/c.jpg", 3)])
        .await
        .unwrap();
    let album = AlbumRepo::find_by_id(&pool, album.id).await.unwrap().unwrap();
    assert_eq!(album.cover_url, "https://img.example.org/a.jpg");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_batch_into_missing_album_writes_nothing(pool: PgPool) {
    let result = PhotoRepo::create_batch(&pool, 9999, &[new_photo("https://x.org/a.jpg", 1)])
        .await
        .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Test: album deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_album_cascades(pool: PgPool) {
    let album = AlbumRepo::create(&pool, &new_album("Borrar")).await.unwrap();
    let photos: Vec<CreatePhoto> = (1..=5)
        .map(|i| new_photo(&format!("https://img.example.org/{i}.jpg"), i))
        .collect();
    let created = PhotoRepo::create_batch(&pool, album.id, &photos)
        .await
        .unwrap()
        .unwrap();

    // Capped pre-delete leaves the rest to the FK cascade.
    let removed = PhotoRepo::delete_for_album(&pool, album.id, 2).await.unwrap();
    assert_eq!(removed.len(), 2);
    assert_count_matches_rows(&pool, album.id).await;

    let deleted = AlbumRepo::delete(&pool, album.id).await.unwrap();
    assert!(deleted.is_some());
    for photo in &created {
        assert!(PhotoRepo::find_by_id(&pool, photo.id).await.unwrap().is_none());
    }
}

// ---------------------------------------------------------------------------
// Test: purge and recount
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_purge_invalid_urls(pool: PgPool) {
    let album = AlbumRepo::create(&pool, &new_album("Mezcla")).await.unwrap();
    PhotoRepo::create_batch(
        &pool,
        album.id,
        &[
            new_photo("https://img.example.org/ok.jpg", 1),
            new_photo("ftp://img.example.org/no.jpg", 2),
            new_photo("http://a.b", 3),
        ],
    )
    .await
    .unwrap();

    let purged = PhotoRepo::purge_invalid(&pool, album.id).await.unwrap();
    assert_eq!(purged.len(), 2);
    assert_count_matches_rows(&pool, album.id).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_recount_repairs_drift(pool: PgPool) {
    let album = AlbumRepo::create(&pool, &new_album("Deriva")).await.unwrap();
    PhotoRepo::create_batch(&pool, album.id, &[new_photo("https://img.example.org/1.jpg", 1)])
        .await
        .unwrap();

    sqlx::query("UPDATE gallery_albums SET photo_count = 42 WHERE id = $1")
        .bind(album.id)
        .execute(&pool)
        .await
        .unwrap();

    let repaired = AlbumRepo::recount(&pool, album.id).await.unwrap().unwrap();
    assert_eq!(repaired.photo_count, 1);
}

// ---------------------------------------------------------------------------
// Test: keyset pagination
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_album_pages_do_not_overlap(pool: PgPool) {
    for i in 0..5 {
        AlbumRepo::create(&pool, &new_album(&format!("Album {i}")))
            .await
            .unwrap();
    }

    let first = AlbumRepo::list(&pool, None, 2).await.unwrap();
    assert_eq!(first.len(), 2);
    let second = AlbumRepo::list(&pool, Some(first[1].cursor()), 2).await.unwrap();
    assert_eq!(second.len(), 2);
    let third = AlbumRepo::list(&pool, Some(second[1].cursor()), 2).await.unwrap();
    assert_eq!(third.len(), 1);

    let mut ids: Vec<i64> = first.iter().chain(&second).chain(&third).map(|a| a.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 5);
}
