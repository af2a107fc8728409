//! Keyset pagination for admin lists.
//!
//! Lists are ordered by a timestamp column descending with the row id as a
//! tie-breaker. The cursor handed to clients is the `(timestamp, id)` pair of
//! the last row on the previous page, encoded as `"{unix_micros}.{id}"`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Page size used by every admin list unless the caller overrides it.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Upper bound on a caller-supplied page size.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Position after which the next page starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub at: Timestamp,
    pub id: DbId,
}

impl PageCursor {
    pub fn new(at: Timestamp, id: DbId) -> Self {
        Self { at, id }
    }

    /// Encode as the opaque string returned to clients.
    pub fn encode(&self) -> String {
        format!("{}.{}", self.at.timestamp_micros(), self.id)
    }

    /// Parse a cursor previously produced by [`PageCursor::encode`].
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let invalid = || CoreError::Validation(format!("Invalid page cursor '{raw}'"));

        let (micros, id) = raw.trim().split_once('.').ok_or_else(invalid)?;
        let micros: i64 = micros.parse().map_err(|_| invalid())?;
        let id: DbId = id.parse().map_err(|_| invalid())?;
        let at: DateTime<Utc> = DateTime::from_timestamp_micros(micros).ok_or_else(invalid)?;
        Ok(Self { at, id })
    }

    /// Parse an optional query parameter, treating blank as "first page".
    pub fn parse_opt(raw: Option<&str>) -> Result<Option<Self>, CoreError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => Self::parse(value).map(Some),
        }
    }
}

/// One page of results plus the cursor for the next one.
///
/// `next_cursor` is only set when the page came back full; a short page
/// means the list is exhausted.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub count: usize,
    pub next_cursor: Option<String>,
}

impl<T: Serialize> Page<T> {
    /// Assemble a page, deriving the next cursor from the last item.
    pub fn from_rows(items: Vec<T>, limit: i64, key: impl Fn(&T) -> PageCursor) -> Self {
        let full = i64::try_from(items.len()).unwrap_or(i64::MAX) >= limit;
        let next_cursor = if full {
            items.last().map(|last| key(last).encode())
        } else {
            None
        };
        Self {
            count: items.len(),
            items,
            next_cursor,
        }
    }
}
