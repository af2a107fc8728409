//! HTTP-level integration tests for the form builder, the public
//! registration flow without payment, and the submissions console.

mod common;

use axum::http::StatusCode;
use common::{
    admin_token, body_json, delete_auth, get, get_auth, post_empty_auth, post_json,
    post_json_auth, put_json_auth,
};
use serde_json::{json, Value};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn volunteer_fields() -> Value {
    json!([
        { "label": "Nombre completo", "type": "text", "required": true },
        { "label": "Correo", "type": "email", "required": true },
        { "label": "Edad", "type": "number", "min": 14, "max": 99 },
        { "label": "Área", "type": "select", "options": ["Huerta", "Biblioteca"], "required": true },
        { "label": "Días", "type": "checkbox", "options": ["Sábado", "Domingo"] },
        { "label": "Comentarios", "type": "textarea" },
        { "label": "Fecha de inicio", "type": "date" },
    ])
}

async fn create_form(app: axum::Router, token: &str, fields: Value) -> Value {
    let response = post_json_auth(
        app,
        "/api/v1/admin/forms",
        json!({
            "title": "Voluntariado 2025",
            "description": "Sumate al equipo",
            "fields": fields,
        }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

fn field_id(form: &Value, index: usize) -> String {
    form["fields"][index]["id"].as_str().unwrap().to_string()
}

fn labels(form: &Value) -> Vec<String> {
    form["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["label"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Form builder
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_form_mints_field_ids(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let form = create_form(app, &token, volunteer_fields()).await;
    assert_eq!(form["is_active"], false);
    assert_eq!(form["fields"].as_array().unwrap().len(), 7);
    assert!(field_id(&form, 0).starts_with("q_"));
    // `checkbox` is stored as multiselect.
    assert_eq!(form["fields"][4]["type"], "multiselect");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_form_validates_fields(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/admin/forms",
        json!({ "title": "X", "fields": [{ "label": "Área", "type": "select", "options": ["Sola"] }] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app,
        "/api/v1/admin/forms",
        json!({ "title": "   ", "fields": [] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_field_editor_operations(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let form = create_form(app.clone(), &token, json!([{ "label": "A" }, { "label": "B" }])).await;
    let id = form["id"].as_i64().unwrap();
    let base = format!("/api/v1/admin/forms/{id}/fields");
    let first_id = field_id(&form, 0);

    // Add.
    let response = post_json_auth(app.clone(), &base, json!({ "label": "C" }), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let form = body_json(response).await["data"].clone();
    assert_eq!(labels(&form), ["A", "B", "C"]);

    // Move the last one up, then the first one down.
    let form = body_json(post_empty_auth(app.clone(), &format!("{base}/2/move-up"), &token).await)
        .await["data"]
        .clone();
    assert_eq!(labels(&form), ["A", "C", "B"]);
    let form =
        body_json(post_empty_auth(app.clone(), &format!("{base}/0/move-down"), &token).await)
            .await["data"]
            .clone();
    assert_eq!(labels(&form), ["C", "A", "B"]);

    // Moving past the ends changes nothing.
    let form = body_json(post_empty_auth(app.clone(), &format!("{base}/0/move-up"), &token).await)
        .await["data"]
        .clone();
    assert_eq!(labels(&form), ["C", "A", "B"]);

    // Edit keeps the id.
    let response = put_json_auth(
        app.clone(),
        &format!("{base}/1"),
        json!({ "label": "A bis", "type": "textarea" }),
        &token,
    )
    .await;
    let form = body_json(response).await["data"].clone();
    assert_eq!(field_id(&form, 1), first_id);
    assert_eq!(form["fields"][1]["type"], "textarea");

    // Remove.
    let form = body_json(delete_auth(app.clone(), &format!("{base}/2"), &token).await).await
        ["data"]
        .clone();
    assert_eq!(labels(&form), ["C", "A bis"]);

    // Out-of-range index.
    let response = put_json_auth(app, &format!("{base}/9"), json!({ "label": "Z" }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_last_field_cannot_be_removed(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let form = create_form(app.clone(), &token, json!([{ "label": "Única" }])).await;
    let id = form["id"].as_i64().unwrap();

    let response = delete_auth(app, &format!("/api/v1/admin/forms/{id}/fields/0"), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Activating one form deactivates the previously active one.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_single_active_form(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let first = create_form(app.clone(), &token, volunteer_fields()).await["id"]
        .as_i64()
        .unwrap();
    let second = create_form(app.clone(), &token, volunteer_fields()).await["id"]
        .as_i64()
        .unwrap();

    for id in [first, second] {
        let response =
            post_empty_auth(app.clone(), &format!("/api/v1/admin/forms/{id}/activate"), &token)
                .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let json = body_json(get_auth(app.clone(), &format!("/api/v1/admin/forms/{first}"), &token).await).await;
    assert_eq!(json["data"]["is_active"], false);

    let json = body_json(get(app, "/api/v1/forms/public").await).await;
    assert_eq!(json["data"]["fallback"], false);
    let forms = json["data"]["forms"].as_array().unwrap();
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0]["id"], second);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_form_without_fields_cannot_be_activated(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let id = create_form(app.clone(), &token, json!([])).await["id"]
        .as_i64()
        .unwrap();
    let response =
        post_empty_auth(app, &format!("/api/v1/admin/forms/{id}/activate"), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Public registration (no payment)
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_public_list_falls_back_to_recent_forms(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);

    create_form(app.clone(), &token, volunteer_fields()).await;

    let json = body_json(get(app, "/api/v1/forms/public").await).await;
    assert_eq!(json["data"]["fallback"], true);
    let form = &json["data"]["forms"][0];
    assert_eq!(form["page_count"], 2);
    assert_eq!(form["requires_payment"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_page_validation_reports_first_invalid_field(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let form = create_form(app.clone(), &token, volunteer_fields()).await;
    let id = form["id"].as_i64().unwrap();
    let name = field_id(&form, 0);
    let email = field_id(&form, 1);
    let area = field_id(&form, 3);
    let uri = format!("/api/v1/forms/{id}/pages/0/validate");

    let json = body_json(
        post_json(
            app.clone(),
            &uri,
            json!({ "answers": { name.clone(): "Ana", email.clone(): "roto" } }),
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["valid"], false);
    assert_eq!(json["data"]["invalid"]["field_id"], email);

    let json = body_json(
        post_json(
            app.clone(),
            &uri,
            json!({ "answers": { name: "Ana", email: "ana@example.org", area: "Huerta" } }),
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["valid"], true);
    assert!(json["data"]["invalid"].is_null());

    // Page two only has optional questions.
    let json = body_json(
        post_json(app.clone(), &format!("/api/v1/forms/{id}/pages/1/validate"), json!({})).await,
    )
    .await;
    assert_eq!(json["data"]["valid"], true);

    let response = post_json(app, &format!("/api/v1/forms/{id}/pages/5/validate"), json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_and_review_registration(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let form = create_form(app.clone(), &token, volunteer_fields()).await;
    let id = form["id"].as_i64().unwrap();
    let answers = json!({
        field_id(&form, 0): "  Ana   Pérez ",
        field_id(&form, 1): "ANA@Example.org",
        field_id(&form, 2): "31",
        field_id(&form, 3): "Huerta",
        field_id(&form, 4): ["Sábado", "Sábado", "Domingo"],
        field_id(&form, 6): "31/12/2025",
        "intruso": "ignored",
    });

    let response = post_json(
        app.clone(),
        &format!("/api/v1/forms/{id}/submissions"),
        json!({ "answers": answers, "page": "/inscripciones" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let submission_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = get_auth(
        app.clone(),
        &format!("/api/v1/admin/submissions/{submission_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let stored = &json["data"]["submission"];
    assert_eq!(stored["form_title"], "Voluntariado 2025");
    assert_eq!(stored["status"], "new");
    assert!(stored["payment"].is_null());
    assert_eq!(stored["meta"]["page"], "/inscripciones");
    assert_eq!(stored["answers"][field_id(&form, 0)], "Ana Pérez");
    assert_eq!(stored["answers"][field_id(&form, 1)], "ana@example.org");
    assert_eq!(stored["answers"][field_id(&form, 4)], json!(["Sábado", "Domingo"]));
    // Unparseable optional date collapses to empty.
    assert_eq!(stored["answers"][field_id(&form, 6)], "");
    assert!(stored["answers"].get("intruso").is_none());

    // Labeled answers follow the form's question order.
    let labeled = json["data"]["answers"].as_array().unwrap();
    assert_eq!(labeled.len(), 7);
    assert_eq!(labeled[0]["label"], "Nombre completo");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_rejects_invalid_choice(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let form = create_form(app.clone(), &token, volunteer_fields()).await;
    let id = form["id"].as_i64().unwrap();
    let answers = json!({
        field_id(&form, 0): "Ana",
        field_id(&form, 1): "ana@example.org",
        field_id(&form, 3): "Cocina",
    });

    let response = post_json(
        app,
        &format!("/api/v1/forms/{id}/submissions"),
        json!({ "answers": answers }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_refused_while_registrations_closed(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let form = create_form(app.clone(), &token, json!([{ "label": "Nombre" }])).await;
    let id = form["id"].as_i64().unwrap();

    put_json_auth(
        app.clone(),
        "/api/v1/admin/config/inscripciones",
        json!({ "enabled": false }),
        &token,
    )
    .await;

    let response = post_json(
        app,
        &format!("/api/v1/forms/{id}/submissions"),
        json!({ "answers": {} }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Submissions console
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submission_status_and_filters(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let form = create_form(app.clone(), &token, json!([{ "label": "Nombre" }])).await;
    let id = form["id"].as_i64().unwrap();
    let other = create_form(app.clone(), &token, json!([{ "label": "Nombre" }])).await;
    let other_id = other["id"].as_i64().unwrap();

    let mut ids = Vec::new();
    for form_id in [id, id, other_id] {
        let response = post_json(
            app.clone(),
            &format!("/api/v1/forms/{form_id}/submissions"),
            json!({ "answers": {} }),
        )
        .await;
        ids.push(body_json(response).await["data"]["id"].as_i64().unwrap());
    }

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/admin/submissions/{}/status", ids[0]),
        json!({ "status": "reviewed" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get_auth(app.clone(), "/api/v1/admin/submissions", &token).await).await;
    assert_eq!(json["data"]["count"], 2);

    let json = body_json(
        get_auth(
            app.clone(),
            &format!("/api/v1/admin/submissions?status=all&form_id={id}"),
            &token,
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["count"], 2);

    // Verification only applies to paid submissions.
    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/admin/submissions/{}/verification", ids[1]),
        json!({ "verification": "verified" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = delete_auth(
        app.clone(),
        &format!("/api/v1/admin/submissions/{}", ids[2]),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = put_json_auth(
        app,
        &format!("/api/v1/admin/submissions/{}/status", ids[2]),
        json!({ "status": "reviewed" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Deleting a form keeps its submissions and their stored title.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submissions_survive_form_deletion(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let form = create_form(app.clone(), &token, json!([{ "label": "Nombre" }])).await;
    let id = form["id"].as_i64().unwrap();
    let key = field_id(&form, 0);

    let response = post_json(
        app.clone(),
        &format!("/api/v1/forms/{id}/submissions"),
        json!({ "answers": { key.clone(): "Ana" } }),
    )
    .await;
    let submission_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = delete_auth(app.clone(), &format!("/api/v1/admin/forms/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = body_json(
        get_auth(app, &format!("/api/v1/admin/submissions/{submission_id}"), &token).await,
    )
    .await;
    assert_eq!(json["data"]["submission"]["form_title"], "Voluntariado 2025");
    // Without the form, answers are labeled by their raw id.
    assert_eq!(json["data"]["answers"][0]["label"], key);
}
