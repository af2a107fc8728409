//! Public contact form validation.

use serde::Deserialize;

use crate::error::CoreError;
use crate::sanitize::{clean_email, clean_line, clean_phone, clean_text};

/// Value stored in `contact_messages.source` for the website form.
pub const SOURCE_WEB: &str = "web_contacto";

pub const NAME_MAX: usize = 120;
pub const SUBJECT_MAX: usize = 160;
pub const MESSAGE_MAX: usize = 5000;

/// Raw contact form input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

/// Sanitized contact message ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanContact {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

impl ContactInput {
    /// Name, email and message are required; the email must be valid.
    /// A phone with too few digits is dropped rather than rejected.
    pub fn clean(&self) -> Result<CleanContact, CoreError> {
        let name = clean_line(&self.name, NAME_MAX);
        let message = clean_text(&self.message, MESSAGE_MAX, true);
        if name.is_empty() || self.email.trim().is_empty() || message.is_empty() {
            return Err(CoreError::Validation(
                "Name, email and message are required".into(),
            ));
        }
        let email = clean_email(&self.email)
            .ok_or_else(|| CoreError::Validation("Email address is not valid".into()))?;

        Ok(CleanContact {
            name,
            email,
            phone: clean_phone(&self.phone).unwrap_or_default(),
            subject: clean_line(&self.subject, SUBJECT_MAX),
            message,
        })
    }
}
