//! Domain rules for the foundation website and its admin back office.
//!
//! Everything here is pure (no database, no HTTP) so it can be unit tested
//! in isolation and shared by the `ong-db` and `ong-api` crates.

pub mod contact;
pub mod error;
pub mod field_draft;
pub mod fields;
pub mod forms;
pub mod gallery;
pub mod lockout;
pub mod pagination;
pub mod payment;
pub mod projects;
pub mod roles;
pub mod sanitize;
pub mod site_config;
pub mod status;
pub mod storage;
pub mod throttle;
pub mod types;
pub mod uploads;
