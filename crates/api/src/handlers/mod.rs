pub mod auth;
pub mod config;
pub mod contact;
pub mod forms;
pub mod gallery;
pub mod projects;
pub mod registration;
pub mod submissions;
