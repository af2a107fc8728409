use std::path::PathBuf;

use ong_core::throttle::DEFAULT_MIN_INTERVAL_SECS;
use ong_storage::StorageBackend;

use crate::auth::jwt::JwtConfig;

/// Default request body cap: the 8 MiB proof limit plus multipart overhead.
const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Maximum accepted request body in bytes.
    pub max_body_bytes: usize,
    /// Minimum seconds between two public submissions from one client.
    pub submission_min_interval_secs: u64,
    /// Lowercased emails allowed to hold an admin account. Empty means any.
    pub admin_emails: Vec<String>,
    /// First admin account created at startup when none exists.
    pub bootstrap_admin: Option<BootstrapAdmin>,
    /// Object storage backend for uploads.
    pub storage: StorageBackend,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

/// Credentials for the startup admin account.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                        |
    /// |---------------------------------|--------------------------------|
    /// | `HOST`                          | `0.0.0.0`                      |
    /// | `PORT`                          | `3000`                         |
    /// | `CORS_ORIGINS`                  | `http://localhost:5173`        |
    /// | `REQUEST_TIMEOUT_SECS`          | `30`                           |
    /// | `MAX_BODY_BYTES`                | `10485760`                     |
    /// | `SUBMISSION_MIN_INTERVAL_SECS`  | `60`                           |
    /// | `ADMIN_EMAILS`                  | empty (no restriction)         |
    /// | `BOOTSTRAP_ADMIN_EMAIL`         | unset                          |
    /// | `BOOTSTRAP_ADMIN_PASSWORD`      | unset                          |
    /// | `STORAGE_BACKEND`               | `local` (`local`, `s3`, `memory`) |
    /// | `STORAGE_LOCAL_ROOT`            | `./storage`                    |
    /// | `STORAGE_PUBLIC_BASE_URL`       | `http://localhost:3000/files`  |
    /// | `STORAGE_S3_BUCKET`             | required when backend is `s3`  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = split_list(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_body_bytes: usize = std::env::var("MAX_BODY_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_BODY_BYTES.to_string())
            .parse()
            .expect("MAX_BODY_BYTES must be a valid usize");

        let submission_min_interval_secs: u64 = std::env::var("SUBMISSION_MIN_INTERVAL_SECS")
            .unwrap_or_else(|_| DEFAULT_MIN_INTERVAL_SECS.to_string())
            .parse()
            .expect("SUBMISSION_MIN_INTERVAL_SECS must be a valid u64");

        let admin_emails = split_list(&std::env::var("ADMIN_EMAILS").unwrap_or_default())
            .into_iter()
            .map(|e| e.to_lowercase())
            .collect();

        let bootstrap_admin = match (
            std::env::var("BOOTSTRAP_ADMIN_EMAIL"),
            std::env::var("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) if !email.trim().is_empty() => Some(BootstrapAdmin {
                email: email.trim().to_lowercase(),
                password,
            }),
            _ => None,
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_body_bytes,
            submission_min_interval_secs,
            admin_emails,
            bootstrap_admin,
            storage: storage_from_env(),
            jwt: JwtConfig::from_env(),
        }
    }

    /// Whether `email` may hold an admin account.
    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.admin_emails.is_empty() || self.admin_emails.iter().any(|e| *e == email)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Read the storage backend selection.
///
/// # Panics
///
/// Panics on an unknown `STORAGE_BACKEND`, or when `s3` is selected without
/// `STORAGE_S3_BUCKET`.
fn storage_from_env() -> StorageBackend {
    let base_url = std::env::var("STORAGE_PUBLIC_BASE_URL").ok();
    let backend = std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "local".into());

    match backend.as_str() {
        "local" => StorageBackend::Local {
            root: PathBuf::from(
                std::env::var("STORAGE_LOCAL_ROOT").unwrap_or_else(|_| "./storage".into()),
            ),
            public_base_url: base_url.unwrap_or_else(|| "http://localhost:3000/files".into()),
        },
        "s3" => StorageBackend::S3 {
            bucket: std::env::var("STORAGE_S3_BUCKET")
                .expect("STORAGE_S3_BUCKET must be set when STORAGE_BACKEND=s3"),
            public_base_url: base_url,
        },
        "memory" => StorageBackend::Memory {
            public_base_url: base_url.unwrap_or_else(|| "http://localhost:3000/files".into()),
        },
        other => panic!("Unknown STORAGE_BACKEND '{other}'. Expected local, s3 or memory"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_drops_blanks() {
        assert_eq!(split_list(" a@x.org, ,b@x.org "), vec!["a@x.org", "b@x.org"]);
        assert!(split_list("").is_empty());
    }
}
