//! Upload validation and object-storage key layout.
//!
//! Keys:
//! - `galleryAlbums/{year}/cover_{uid}.{ext}`: album covers
//! - `galleryAlbums/{album_id}/img_{uid}.{ext}`: album photos
//! - `projects/{year}/cover_{uid}.{ext}`: project covers
//! - `comprobantes/{year}/{form_id}/{pay_id}.{ext}`: payment proofs

use chrono::Datelike;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

const MIB: usize = 1024 * 1024;

/// Maximum admin image upload size (4 MiB).
pub const MAX_IMAGE_BYTES: usize = 4 * MIB;

/// Maximum payment proof upload size (8 MiB).
pub const MAX_PROOF_BYTES: usize = 8 * MIB;

/// A file received from a multipart request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Lowercase alphanumeric extension (max 5 chars) or `fallback`.
    pub fn extension(&self, fallback: &str) -> String {
        file_extension(&self.file_name, fallback)
    }
}

fn mib(bytes: usize) -> f64 {
    bytes as f64 / MIB as f64
}

/// Accept `image/*` files up to [`MAX_IMAGE_BYTES`].
pub fn validate_image(file: &UploadedFile) -> Result<(), CoreError> {
    if !file.content_type.starts_with("image/") {
        return Err(CoreError::Validation(format!(
            "File '{}' must be an image",
            file.file_name
        )));
    }
    if file.size() > MAX_IMAGE_BYTES {
        return Err(CoreError::PayloadTooLarge(format!(
            "Maximum {} MB. '{}' is {:.2} MB",
            MAX_IMAGE_BYTES / MIB,
            file.file_name,
            mib(file.size())
        )));
    }
    Ok(())
}

/// Accept images or PDFs up to [`MAX_PROOF_BYTES`].
pub fn validate_proof(file: &UploadedFile) -> Result<(), CoreError> {
    let is_image = file.content_type.starts_with("image/");
    let is_pdf = file.content_type == "application/pdf";
    if !is_image && !is_pdf {
        return Err(CoreError::Validation(
            "Proof of payment must be an image or a PDF".into(),
        ));
    }
    if file.size() > MAX_PROOF_BYTES {
        return Err(CoreError::PayloadTooLarge(format!(
            "Maximum {} MB. The proof is {:.2} MB",
            MAX_PROOF_BYTES / MIB,
            mib(file.size())
        )));
    }
    Ok(())
}

/// Extract a safe extension from a file name.
pub fn file_extension(file_name: &str, fallback: &str) -> String {
    let ext: String = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .unwrap_or("")
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(5)
        .collect::<String>()
        .to_lowercase();
    if ext.is_empty() {
        fallback.to_string()
    } else {
        ext
    }
}

fn unique_name(prefix: &str) -> String {
    format!("{prefix}_{}", uuid::Uuid::now_v7().simple())
}

pub fn album_cover_key(now: Timestamp, ext: &str) -> String {
    format!("galleryAlbums/{}/{}.{ext}", now.year(), unique_name("cover"))
}

pub fn album_photo_key(album_id: DbId, ext: &str) -> String {
    format!("galleryAlbums/{album_id}/{}.{ext}", unique_name("img"))
}

pub fn project_cover_key(now: Timestamp, ext: &str) -> String {
    format!("projects/{}/{}.{ext}", now.year(), unique_name("cover"))
}

pub fn proof_key(now: Timestamp, form_id: DbId, pay_id: &str, ext: &str) -> String {
    format!("comprobantes/{}/{form_id}/{pay_id}.{ext}", now.year())
}
