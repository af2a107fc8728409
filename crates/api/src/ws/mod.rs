//! WebSocket feed that pushes config-gate changes to the public site.
//!
//! Provides connection management, heartbeat monitoring, the message
//! format, and the HTTP upgrade handler used by Axum routes.

pub mod events;
mod handler;
mod heartbeat;
pub mod manager;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
