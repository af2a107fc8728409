//! Input sanitizers applied to everything a visitor or admin types.
//!
//! These run server-side on every write path. They never fail: inputs that
//! cannot be salvaged come back as `None` (or an empty string for free
//! text) and the caller decides whether that is a validation error.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Default cap for free text fields.
pub const DEFAULT_TEXT_MAX: usize = 5000;

/// Maximum stored email length.
pub const EMAIL_MAX: usize = 120;

/// Maximum stored phone length (digits and `+`).
pub const PHONE_MAX: usize = 20;

/// Minimum digit count for a phone number to be accepted.
pub const PHONE_MIN_DIGITS: usize = 7;

/// Maximum stored URL length.
pub const URL_MAX: usize = 500;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$").expect("valid regex"));

static HTTP_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://[^\s/?#]+[^\s]*$").expect("valid regex"));

static URL_IN_TEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)https?://[^\s"'<>]+"#).expect("valid regex"));

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

/// Normalize free text.
///
/// Strips NUL bytes, collapses runs of horizontal whitespace into a single
/// space, trims, removes `<` and `>`, optionally flattens newlines into
/// spaces, and truncates to `max` characters.
pub fn clean_text(input: &str, max: usize, allow_newlines: bool) -> String {
    let mut collapsed = String::with_capacity(input.len());
    let mut in_space = false;
    for ch in input.chars() {
        if ch == '\0' {
            continue;
        }
        if ch.is_whitespace() && ch != '\n' && ch != '\r' {
            if !in_space {
                collapsed.push(' ');
                in_space = true;
            }
            continue;
        }
        in_space = false;
        collapsed.push(ch);
    }

    let no_tags: String = collapsed.trim().chars().filter(|c| *c != '<' && *c != '>').collect();

    let normalized = if allow_newlines {
        no_tags
    } else {
        let mut flat = String::with_capacity(no_tags.len());
        let mut in_break = false;
        for ch in no_tags.chars() {
            if ch == '\n' || ch == '\r' {
                if !in_break {
                    flat.push(' ');
                    in_break = true;
                }
                continue;
            }
            in_break = false;
            flat.push(ch);
        }
        flat
    };

    truncate_chars(&normalized, max)
}

/// Single-line variant of [`clean_text`] used for titles and labels.
pub fn clean_line(input: &str, max: usize) -> String {
    clean_text(input, max, false)
}

/// Truncate a string to at most `max` characters (not bytes).
pub fn truncate_chars(input: &str, max: usize) -> String {
    match input.char_indices().nth(max) {
        Some((idx, _)) => input[..idx].to_string(),
        None => input.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Contact data
// ---------------------------------------------------------------------------

/// Lowercase and validate an email address. Returns `None` when invalid.
pub fn clean_email(input: &str) -> Option<String> {
    let email = truncate_chars(&input.trim().to_lowercase(), EMAIL_MAX);
    EMAIL_RE.is_match(&email).then_some(email)
}

/// Keep only digits and `+`. Returns `None` with fewer than seven digits.
pub fn clean_phone(input: &str) -> Option<String> {
    let kept: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .take(PHONE_MAX)
        .collect();
    let digits = kept.chars().filter(char::is_ascii_digit).count();
    (digits >= PHONE_MIN_DIGITS).then_some(kept)
}

// ---------------------------------------------------------------------------
// URLs
// ---------------------------------------------------------------------------

/// Accept only absolute `http`/`https` URLs with a host.
pub fn clean_url(input: &str) -> Option<String> {
    let url = truncate_chars(input.trim(), URL_MAX);
    if url.is_empty() {
        return None;
    }
    HTTP_URL_RE.is_match(&url).then_some(url)
}

/// Pull every `http(s)://` URL out of free text.
///
/// Trailing list punctuation is trimmed and each match goes through
/// [`clean_url`]; duplicates are dropped keeping the first occurrence, and at
/// most `max` URLs are returned.
pub fn extract_urls(text: &str, max: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    URL_IN_TEXT_RE
        .find_iter(text)
        .filter_map(|m| clean_url(m.as_str().trim_end_matches([',', ';', ')', '.'])))
        .filter(|u| seen.insert(u.clone()))
        .take(max)
        .collect()
}

// ---------------------------------------------------------------------------
// Numbers
// ---------------------------------------------------------------------------

/// Clamp an optional integer into `[min, max]`, using `fallback` when absent.
pub fn clamp_int(value: Option<i64>, min: i64, max: i64, fallback: i64) -> i64 {
    match value {
        Some(v) => v.clamp(min, max),
        None => fallback,
    }
}
