//! Gallery album and photo rules.

use crate::error::CoreError;
use crate::sanitize::{clamp_int, clean_line, clean_text};
use crate::uploads::MAX_IMAGE_BYTES;

pub const ALBUM_TITLE_MAX: usize = 120;
pub const ALBUM_DESC_MAX: usize = 500;
pub const CAPTION_MAX: usize = 140;

/// Sort order bounds for albums and photos.
pub const ORDER_MIN: i64 = 1;
pub const ORDER_MAX: i64 = 999;

/// Maximum external URLs accepted in one batch add.
pub const MAX_URLS_PER_BATCH: usize = 200;

/// Maximum image files accepted in one batch add.
pub const MAX_FILES_PER_BATCH: usize = 12;

/// Request body cap for a batch add: every file at the image limit plus
/// one MiB for text parts and multipart framing.
pub const PHOTO_BATCH_BODY_BYTES: usize = MAX_FILES_PER_BATCH * MAX_IMAGE_BYTES + 1024 * 1024;

/// Photos removed one by one (with their storage objects) when deleting an
/// album. Rows beyond this are removed by the foreign-key cascade only.
pub const CASCADE_PHOTO_LIMIT: i64 = 500;

/// Albums returned to the public gallery.
pub const PUBLIC_ALBUM_LIMIT: i64 = 80;

/// Photos returned per album to the public gallery.
pub const PUBLIC_PHOTO_LIMIT: i64 = 240;

/// Image URLs shorter than this are considered broken.
const MIN_PHOTO_URL_LEN: usize = 12;

/// Clamp a sort order into `[1, 999]`, defaulting to 1.
pub fn clamp_order(order: Option<i64>) -> i32 {
    clamp_int(order, ORDER_MIN, ORDER_MAX, ORDER_MIN) as i32
}

/// Order for the `i`-th photo of a batch that starts at `start`.
pub fn batch_order(start: i32, i: usize) -> i32 {
    let offset = i64::try_from(i).unwrap_or(ORDER_MAX);
    clamp_order(Some(i64::from(start) + offset))
}

/// Sanitized album title, required.
pub fn album_title(raw: &str) -> Result<String, CoreError> {
    let title = clean_line(raw, ALBUM_TITLE_MAX);
    if title.is_empty() {
        return Err(CoreError::Validation("Album title is required".into()));
    }
    Ok(title)
}

pub fn album_description(raw: &str) -> String {
    clean_text(raw, ALBUM_DESC_MAX, true)
}

pub fn caption(raw: &str) -> String {
    clean_line(raw, CAPTION_MAX)
}

/// Whether a stored photo URL is usable (http(s) and not truncated).
pub fn is_valid_photo_url(url: &str) -> bool {
    let url = url.trim();
    let lower = url.to_ascii_lowercase();
    (lower.starts_with("http://") || lower.starts_with("https://"))
        && url.chars().count() >= MIN_PHOTO_URL_LEN
}
