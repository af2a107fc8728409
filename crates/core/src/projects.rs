//! Project showcase rules.

use chrono::NaiveDate;

use crate::error::CoreError;
use crate::sanitize::{clean_line, clean_text};

pub const TITLE_MAX: usize = 120;
pub const SUMMARY_MAX: usize = 600;
pub const IMPACT_MAX: usize = 600;
pub const LOCATION_MAX: usize = 80;
pub const PERIOD_MAX: usize = 60;

/// Projects returned by the public listing.
pub const PUBLIC_LIST_LIMIT: i64 = 50;

/// Featured projects returned for the home page.
pub const FEATURED_LIMIT: i64 = 9;

/// Sanitized project texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectTexts {
    pub title: String,
    pub summary: String,
    pub impact: String,
    pub location: String,
    pub period: String,
}

impl ProjectTexts {
    pub fn clean(
        title: &str,
        summary: &str,
        impact: &str,
        location: &str,
        period: &str,
    ) -> Result<Self, CoreError> {
        let title = clean_line(title, TITLE_MAX);
        if title.is_empty() {
            return Err(CoreError::Validation("Project title is required".into()));
        }
        Ok(Self {
            title,
            summary: clean_text(summary, SUMMARY_MAX, true),
            impact: clean_text(impact, IMPACT_MAX, true),
            location: clean_line(location, LOCATION_MAX),
            period: clean_line(period, PERIOD_MAX),
        })
    }
}

/// Parse a `YYYY-MM-DD` project date; blank means `today`.
pub fn parse_project_date(raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate, CoreError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(today),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
            CoreError::Validation(format!("Invalid project date '{value}', expected YYYY-MM-DD"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_required() {
        assert!(ProjectTexts::clean(" ", "", "", "", "").is_err());
    }

    #[test]
    fn texts_are_truncated() {
        let long = "x".repeat(700);
        let texts = ProjectTexts::clean("Huerta", &long, "", &long, "").unwrap();
        assert_eq!(texts.summary.len(), SUMMARY_MAX);
        assert_eq!(texts.location.len(), LOCATION_MAX);
    }

    #[test]
    fn date_defaults_to_today() {
        let today = NaiveDate::from_ymd_opt(2025, 5, 4).unwrap();
        assert_eq!(parse_project_date(None, today).unwrap(), today);
        assert_eq!(
            parse_project_date(Some("2024-12-01"), today).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 1).unwrap()
        );
        assert!(parse_project_date(Some("01/12/2024"), today).is_err());
    }
}
