//! Request extractors shared by handlers.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated admin from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`client::ClientAddr`] -- Identifies the caller for the submission throttle.

pub mod auth;
pub mod client;
pub mod rbac;
