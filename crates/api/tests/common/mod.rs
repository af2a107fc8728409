#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use ong_api::auth::jwt::{generate_access_token, JwtConfig};
use ong_api::auth::password::hash_password;
use ong_api::config::ServerConfig;
use ong_api::router::build_app_router;
use ong_api::state::AppState;
use ong_api::ws::WsManager;
use ong_core::roles::ROLE_ADMIN;
use ong_db::models::admin_user::CreateAdminUser;
use ong_db::repositories::AdminUserRepo;
use ong_storage::{MemoryStore, StorageBackend};

pub const FILES_BASE_URL: &str = "http://files.test";

/// Build a test `ServerConfig` with safe defaults.
///
/// In-memory storage, no submission throttle, and no admin allowlist.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_body_bytes: 10 * 1024 * 1024,
        submission_min_interval_secs: 0,
        admin_emails: Vec::new(),
        bootstrap_admin: None,
        storage: StorageBackend::Memory {
            public_base_url: FILES_BASE_URL.to_string(),
        },
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router over `pool` with a given config.
///
/// Returns the memory store so tests can inspect uploaded objects.
pub fn build_app_with(pool: PgPool, config: ServerConfig) -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new(FILES_BASE_URL.to_string()));
    let state = AppState::new(
        pool,
        Arc::new(config.clone()),
        Arc::new(WsManager::new()),
        store.clone(),
    );
    (build_app_router(state, &config), store)
}

/// Build the full application router with the default test config.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_with(pool, test_config()).0
}

/// Insert an admin account directly and return a bearer token for it.
pub async fn admin_token(pool: &PgPool) -> String {
    let user = AdminUserRepo::create(
        pool,
        &CreateAdminUser {
            email: "admin@fundacion.test".to_string(),
            password_hash: hash_password("admin-pass-123").expect("hashing should succeed"),
        },
    )
    .await
    .expect("admin creation should succeed");
    generate_access_token(user.id, ROLE_ADMIN, &test_config().jwt)
        .expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should complete")
}

fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: &serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request should build")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, empty_request("GET", uri, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request("GET", uri, Some(token))).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request("POST", uri, None, &body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request("POST", uri, Some(token), &body)).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    send(app, empty_request("POST", uri, None)).await
}

pub async fn post_empty_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request("POST", uri, Some(token))).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request("PUT", uri, Some(token), &body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request("DELETE", uri, Some(token))).await
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "ong-test-boundary";

/// One part of a multipart body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: Vec<u8>,
    },
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Send a multipart request, with a bearer token when given.
pub async fn multipart(
    app: Router,
    method: &str,
    uri: &str,
    parts: &[Part<'_>],
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri).header(
        CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder
        .body(Body::from(multipart_body(parts)))
        .expect("request should build");
    send(app, request).await
}

/// A small PNG-typed payload; content is not decoded.
pub fn png(name: &str) -> Part<'_> {
    Part::File {
        name: "file",
        file_name: name,
        content_type: "image/png",
        bytes: vec![0x89, b'P', b'N', b'G', 0, 1, 2, 3],
    }
}
