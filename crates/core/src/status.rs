//! Text-valued status enums stored in `TEXT` columns with `CHECK` constraints.
//!
//! Every variant maps to the exact lowercase string persisted in the
//! database and exchanged over the API.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Query value that disables the status filter on admin lists.
pub const FILTER_ALL: &str = "all";

macro_rules! define_text_status {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// All accepted database values, in declaration order.
            pub const VALUES: &'static [&'static str] = &[$($val),+];

            /// Return the database value.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $val ),+
                }
            }

            /// Parse a database/API value.
            pub fn parse(value: &str) -> Result<Self, CoreError> {
                match value {
                    $( $val => Ok($name::$variant), )+
                    other => Err(CoreError::Validation(format!(
                        "Invalid {} '{other}'. Must be one of: {:?}",
                        stringify!($name),
                        Self::VALUES
                    ))),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

define_text_status! {
    /// Triage state of a contact message.
    ContactStatus {
        New = "new",
        Read = "read",
        Archived = "archived",
    }
}

define_text_status! {
    /// Triage state of a registration submission.
    SubmissionStatus {
        New = "new",
        Reviewed = "reviewed",
        Archived = "archived",
    }
}

define_text_status! {
    /// Admin verdict on a claimed proof of payment.
    PaymentVerification {
        Pending = "pending",
        Verified = "verified",
        Rejected = "rejected",
    }
}

/// Resolve the `status` query parameter of an admin list.
///
/// Absent means "only new items"; `all` removes the filter; anything else
/// must be a valid status value.
pub fn resolve_status_filter(
    raw: Option<&str>,
    parse: fn(&str) -> Result<&'static str, CoreError>,
) -> Result<Option<&'static str>, CoreError> {
    match raw.map(str::trim) {
        None | Some("") => parse("new").map(Some),
        Some(FILTER_ALL) => Ok(None),
        Some(value) => parse(value).map(Some),
    }
}

/// Adapter for [`resolve_status_filter`] over [`ContactStatus`].
pub fn contact_status_value(value: &str) -> Result<&'static str, CoreError> {
    ContactStatus::parse(value).map(ContactStatus::as_str)
}

/// Adapter for [`resolve_status_filter`] over [`SubmissionStatus`].
pub fn submission_status_value(value: &str) -> Result<&'static str, CoreError> {
    SubmissionStatus::parse(value).map(SubmissionStatus::as_str)
}
