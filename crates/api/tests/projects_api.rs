//! HTTP-level integration tests for the project showcase.

mod common;

use axum::http::StatusCode;
use common::{admin_token, body_json, build_app_with, delete_auth, get, get_auth, multipart, Part};
use serde_json::Value;
use sqlx::PgPool;

async fn create_project(app: axum::Router, token: &str, parts: &[Part<'_>]) -> Value {
    let response = multipart(app, "POST", "/api/v1/admin/projects", parts, Some(token)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

fn cover(name: &str) -> Part<'_> {
    Part::File {
        name: "cover",
        file_name: name,
        content_type: "image/webp",
        bytes: b"RIFF0000WEBP".to_vec(),
    }
}

fn titles(json: &Value) -> Vec<String> {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap().to_string())
        .collect()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_project_with_cover(pool: PgPool) {
    let token = admin_token(&pool).await;
    let (app, store) = build_app_with(pool, common::test_config());

    let project = create_project(
        app,
        &token,
        &[
            Part::Text("title", " Huerta   comunitaria "),
            Part::Text("summary", "Cultivo con familias del barrio"),
            Part::Text("location", "Asunción"),
            Part::Text("period", "2024-2025"),
            Part::Text("project_date", "2025-03-15"),
            Part::Text("is_featured", "on"),
            cover("portada.webp"),
        ],
    )
    .await;

    assert_eq!(project["title"], "Huerta comunitaria");
    assert_eq!(project["project_date"], "2025-03-15");
    assert_eq!(project["is_featured"], true);
    assert_eq!(project["is_active"], true);
    let path = project["cover_path"].as_str().unwrap();
    assert!(path.starts_with("projects/") && path.ends_with(".webp"));
    assert!(store.get(path).is_some());
    assert!(project["cover_url"].as_str().unwrap().starts_with(common::FILES_BASE_URL));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_project_validation(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);

    for parts in [
        vec![Part::Text("summary", "Sin título")],
        vec![Part::Text("title", "Fecha"), Part::Text("project_date", "15/03/2025")],
        vec![Part::Text("title", "Portada"), Part::Text("cover_url", "javascript:alert(1)")],
    ] {
        let response =
            multipart(app.clone(), "POST", "/api/v1/admin/projects", &parts, Some(&token)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

/// The public list shows active projects with featured ones first, and the
/// featured filter narrows it for the home page.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_public_listing_and_featured_filter(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);

    create_project(
        app.clone(),
        &token,
        &[Part::Text("title", "Reciente"), Part::Text("project_date", "2025-06-01")],
    )
    .await;
    create_project(
        app.clone(),
        &token,
        &[
            Part::Text("title", "Destacado"),
            Part::Text("project_date", "2023-01-01"),
            Part::Text("is_featured", "true"),
        ],
    )
    .await;
    create_project(
        app.clone(),
        &token,
        &[Part::Text("title", "Borrador"), Part::Text("is_active", "false")],
    )
    .await;

    let json = body_json(get(app.clone(), "/api/v1/projects").await).await;
    assert_eq!(titles(&json), ["Destacado", "Reciente"]);

    let json = body_json(get(app.clone(), "/api/v1/projects?featured=true").await).await;
    assert_eq!(titles(&json), ["Destacado"]);

    // The admin list includes hidden projects.
    let json = body_json(get_auth(app, "/api/v1/admin/projects", &token).await).await;
    assert_eq!(json["data"]["count"], 3);
}

/// Parts left out of an update keep their stored values.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_merges_absent_parts(pool: PgPool) {
    let token = admin_token(&pool).await;
    let (app, store) = build_app_with(pool, common::test_config());

    let project = create_project(
        app.clone(),
        &token,
        &[
            Part::Text("title", "Biblioteca"),
            Part::Text("location", "Luque"),
            cover("a.webp"),
        ],
    )
    .await;
    let id = project["id"].as_i64().unwrap();
    let uri = format!("/api/v1/admin/projects/{id}");
    let old_path = project["cover_path"].as_str().unwrap().to_string();

    let response = multipart(
        app.clone(),
        "PUT",
        &uri,
        &[Part::Text("summary", "Libros para la escuela")],
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["title"], "Biblioteca");
    assert_eq!(updated["location"], "Luque");
    assert_eq!(updated["summary"], "Libros para la escuela");
    assert_eq!(updated["cover_path"], old_path.as_str());

    // Linking an external cover drops the uploaded object.
    let response = multipart(
        app.clone(),
        "PUT",
        &uri,
        &[Part::Text("cover_url", "https://cdn.example.org/biblio.jpg")],
        Some(&token),
    )
    .await;
    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["cover_url"], "https://cdn.example.org/biblio.jpg");
    assert_eq!(updated["cover_path"], "");
    assert!(store.get(&old_path).is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_project(pool: PgPool) {
    let token = admin_token(&pool).await;
    let (app, store) = build_app_with(pool, common::test_config());

    let project = create_project(
        app.clone(),
        &token,
        &[Part::Text("title", "Temporal"), cover("t.webp")],
    )
    .await;
    let uri = format!("/api/v1/admin/projects/{}", project["id"]);

    let response = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(store.keys().is_empty());

    let response = get_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = delete_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_admin_requires_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = multipart(
        app,
        "POST",
        "/api/v1/admin/projects",
        &[Part::Text("title", "Sin sesión")],
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
