//! HTTP-level integration tests for the contact form and the admin inbox.

mod common;

use axum::http::StatusCode;
use common::{
    admin_token, body_json, build_app_with, delete_auth, get, get_auth, post_json,
    put_json_auth,
};
use serde_json::json;
use sqlx::PgPool;

fn message(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "email": "Visitante@Example.COM",
        "phone": "+57 300 123 4567",
        "subject": "Voluntariado",
        "message": "Quiero ayudar los fines de semana.",
    })
}

async fn send(app: axum::Router, name: &str) -> i64 {
    let response = post_json(app, "/api/v1/contact", message(name)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Public form
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_contact_message(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let id = send(app.clone(), "  Ana   Pérez ").await;

    let response = get_auth(app, &format!("/api/v1/admin/contacts/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Ana Pérez");
    assert_eq!(json["data"]["email"], "visitante@example.com");
    assert_eq!(json["data"]["status"], "new");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_requires_name_email_and_message(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        app.clone(),
        "/api/v1/contact",
        json!({ "name": "Ana", "email": "", "message": "Hola" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        app,
        "/api/v1/contact",
        json!({ "name": "Ana", "email": "no-es-correo", "message": "Hola" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_refused_while_gate_closed(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let response = put_json_auth(
        app.clone(),
        "/api/v1/admin/config/contacto",
        json!({ "enabled": false, "closed_title": "Volvemos pronto", "closed_msg": "" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(app, "/api/v1/contact", message("Ana")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Volvemos pronto");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_repeat_submission_is_throttled(pool: PgPool) {
    let mut config = common::test_config();
    config.submission_min_interval_secs = 60;
    let (app, _store) = build_app_with(pool, config);

    send(app.clone(), "Ana").await;

    let response = post_json(app, "/api/v1/contact", message("Ana")).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("retry-after"));
}

// ---------------------------------------------------------------------------
// Admin inbox
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_inbox_requires_admin(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/api/v1/admin/contacts").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// The default filter shows only new messages; `all` shows everything.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_inbox_status_filter(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let first = send(app.clone(), "Ana").await;
    send(app.clone(), "Luis").await;

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/admin/contacts/{first}/status"),
        json!({ "status": "read" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get_auth(app.clone(), "/api/v1/admin/contacts", &token).await).await;
    assert_eq!(json["data"]["count"], 1);
    assert_eq!(json["data"]["items"][0]["name"], "Luis");

    let json = body_json(
        get_auth(app.clone(), "/api/v1/admin/contacts?status=all", &token).await,
    )
    .await;
    assert_eq!(json["data"]["count"], 2);

    let json = body_json(
        get_auth(app.clone(), "/api/v1/admin/contacts?status=read", &token).await,
    )
    .await;
    assert_eq!(json["data"]["items"][0]["id"], first);

    let response = get_auth(app, "/api/v1/admin/contacts?status=bogus", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Newest first; the cursor from a full page fetches the rest.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_inbox_cursor_pagination(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);

    for name in ["Uno", "Dos", "Tres"] {
        send(app.clone(), name).await;
    }

    let json = body_json(
        get_auth(app.clone(), "/api/v1/admin/contacts?limit=2", &token).await,
    )
    .await;
    assert_eq!(json["data"]["count"], 2);
    assert_eq!(json["data"]["items"][0]["name"], "Tres");
    let cursor = json["data"]["next_cursor"].as_str().unwrap().to_string();

    let json = body_json(
        get_auth(
            app.clone(),
            &format!("/api/v1/admin/contacts?limit=2&cursor={cursor}"),
            &token,
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["count"], 1);
    assert_eq!(json["data"]["items"][0]["name"], "Uno");
    assert!(json["data"]["next_cursor"].is_null());

    let response = get_auth(app, "/api/v1/admin/contacts?cursor=garbage", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_contact_message(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let id = send(app.clone(), "Ana").await;
    let uri = format!("/api/v1/admin/contacts/{id}");

    let response = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
