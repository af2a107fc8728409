use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use ong_core::error::CoreError;
use ong_core::storage::ObjectStore;
use ong_core::throttle::{SubmissionKind, SubmissionThrottle};

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: ong_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Live config-gate subscribers.
    pub ws_manager: Arc<WsManager>,
    /// Where uploaded images and payment proofs are written.
    pub store: Arc<dyn ObjectStore>,
    /// Per-client interval between public submissions.
    pub throttle: Arc<Mutex<SubmissionThrottle>>,
}

impl AppState {
    pub fn new(
        pool: ong_db::DbPool,
        config: Arc<ServerConfig>,
        ws_manager: Arc<WsManager>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        let throttle = SubmissionThrottle::new(Duration::from_secs(
            config.submission_min_interval_secs,
        ));
        Self {
            pool,
            config,
            ws_manager,
            store,
            throttle: Arc::new(Mutex::new(throttle)),
        }
    }

    /// Record a public submission attempt from `client`.
    pub fn check_throttle(&self, kind: SubmissionKind, client: &str) -> Result<(), CoreError> {
        let mut throttle = self.throttle.lock().unwrap_or_else(|e| e.into_inner());
        throttle.check(kind, client, Instant::now())
    }

    /// Give back the slot taken by [`AppState::check_throttle`] when the
    /// submission was not stored.
    pub fn release_throttle(&self, kind: SubmissionKind, client: &str) {
        let mut throttle = self.throttle.lock().unwrap_or_else(|e| e.into_inner());
        throttle.release(kind, client);
    }
}
