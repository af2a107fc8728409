//! HTTP API for the foundation website and its admin back office.
//!
//! Exposed as a library so integration tests can build the same router the
//! binary serves.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod uploads;
pub mod ws;
