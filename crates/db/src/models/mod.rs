//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts, built from sanitized input
//! - An update DTO (all `Option` fields) for patches where the API needs one

pub mod admin_user;
pub mod contact;
pub mod form;
pub mod gallery;
pub mod payment_gate;
pub mod project;
pub mod site_config;
pub mod submission;
