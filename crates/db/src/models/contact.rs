//! Contact message model and DTOs.

use ong_core::contact::{CleanContact, SOURCE_WEB};
use ong_core::pagination::PageCursor;
use ong_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `contact_messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContactMessage {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub source: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ContactMessage {
    pub fn cursor(&self) -> PageCursor {
        PageCursor::new(self.created_at, self.id)
    }
}

/// DTO for inserting a contact message from the public form.
#[derive(Debug, Clone)]
pub struct CreateContactMessage {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub source: String,
}

impl From<CleanContact> for CreateContactMessage {
    fn from(clean: CleanContact) -> Self {
        Self {
            name: clean.name,
            email: clean.email,
            phone: clean.phone,
            subject: clean.subject,
            message: clean.message,
            source: SOURCE_WEB.to_string(),
        }
    }
}
