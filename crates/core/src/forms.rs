//! Registration form metadata rules.

use crate::error::CoreError;
use crate::sanitize::{clean_line, clean_text};

pub const FORM_TITLE_MAX: usize = 120;
pub const FORM_DESC_MAX: usize = 500;

/// Active forms listed on the public registration page.
pub const PUBLIC_ACTIVE_LIMIT: i64 = 10;

/// Recent forms listed when none is active.
pub const PUBLIC_FALLBACK_LIMIT: i64 = 5;

pub fn form_title(raw: &str) -> Result<String, CoreError> {
    let title = clean_line(raw, FORM_TITLE_MAX);
    if title.is_empty() {
        return Err(CoreError::Validation("Form title is required".into()));
    }
    Ok(title)
}

pub fn form_description(raw: &str) -> String {
    clean_text(raw, FORM_DESC_MAX, true)
}
