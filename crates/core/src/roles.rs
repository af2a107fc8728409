//! Well-known role name constants.
//!
//! The only role carried in access tokens today is [`ROLE_ADMIN`]; visitors
//! never authenticate.

pub const ROLE_ADMIN: &str = "admin";
