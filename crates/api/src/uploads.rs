//! Multipart parsing and object-storage helpers shared by upload handlers.

use std::collections::HashMap;

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use ong_core::error::CoreError;
use ong_core::storage::{ObjectStore, StoredObject};
use ong_core::uploads::UploadedFile;

use crate::error::{AppError, AppResult};

/// A fully read multipart body.
///
/// Parts with a file name are files (empty file inputs are dropped); every
/// other part is text. A repeated text name keeps the last value.
#[derive(Debug, Default)]
pub struct MultipartForm {
    texts: HashMap<String, String>,
    files: Vec<(String, UploadedFile)>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or("").to_string();
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let bytes = field.bytes().await.map_err(multipart_error)?;
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    form.files.push((
                        name,
                        UploadedFile {
                            file_name,
                            content_type,
                            bytes: bytes.to_vec(),
                        },
                    ));
                }
                None => {
                    let text = field.text().await.map_err(multipart_error)?;
                    form.texts.insert(name, text);
                }
            }
        }
        Ok(form)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.texts.get(name).map(String::as_str)
    }

    /// Parse a checkbox-style flag (`true`, `1`, `on`, `yes`).
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.text(name).map(|v| {
            matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "true" | "1" | "on" | "yes"
            )
        })
    }

    /// Parse an integer part. Blank is treated as absent.
    pub fn int(&self, name: &str) -> AppResult<Option<i64>> {
        match self.text(name).map(str::trim) {
            None | Some("") => Ok(None),
            Some(v) => v.parse().map(Some).map_err(|_| {
                AppError::Core(CoreError::Validation(format!(
                    "'{name}' must be a whole number"
                )))
            }),
        }
    }

    /// Remove and return the first file sent under `name`.
    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        let pos = self.files.iter().position(|(n, _)| n == name)?;
        Some(self.files.remove(pos).1)
    }

    /// Remove and return every file, in the order received.
    pub fn take_files(&mut self) -> Vec<UploadedFile> {
        self.files.drain(..).map(|(_, file)| file).collect()
    }
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::Core(CoreError::PayloadTooLarge(err.body_text()))
    } else {
        AppError::BadRequest(err.body_text())
    }
}

/// Upload a validated file under `key`.
pub async fn store_file(
    store: &dyn ObjectStore,
    key: &str,
    file: UploadedFile,
) -> AppResult<StoredObject> {
    let stored = store.put(key, file.bytes, &file.content_type).await?;
    tracing::debug!(key = %stored.key, "Stored upload");
    Ok(stored)
}

/// Delete an object, logging and swallowing any failure.
///
/// Blank keys (external URLs, no cover) are skipped.
pub async fn remove_best_effort(store: &dyn ObjectStore, key: &str) {
    if key.trim().is_empty() {
        return;
    }
    if let Err(e) = store.delete(key).await {
        tracing::warn!(key = %key, error = %e, "Failed to delete stored object");
    }
}
